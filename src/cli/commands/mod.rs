pub mod auth;
pub mod config;
pub mod notification;
pub mod project;
pub mod task;
pub mod workspace;
