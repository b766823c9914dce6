pub mod formatters;

pub use formatters::{format_date, format_relative_time, initials, truncate};
