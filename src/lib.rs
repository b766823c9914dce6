pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod models;
pub mod notify;
pub mod rbac;
pub mod router;
pub mod session;
pub mod storage;
pub mod store;
pub mod utils;
pub mod validation;

pub use context::AppContext;
pub use error::{ClientError, ClientResult};
