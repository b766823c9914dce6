//! Declarative form validation producing structured field errors.
//!
//! Every check on a field runs; all failures are reported, not just the first.

pub mod forms;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

pub use forms::{PRIORITIES, TASK_STATUSES};

pub(crate) static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages reported for one field, in check order
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Collects field errors for one form
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<'v>(&'v mut self, name: &'static str, value: &'v str) -> StringField<'v> {
        StringField {
            name,
            value,
            errors: &mut self.errors,
        }
    }

    /// Checks run only when the value is present and non-empty
    pub fn optional<'v>(&'v mut self, name: &'static str, value: Option<&'v str>) -> Option<StringField<'v>> {
        match value {
            Some(v) if !v.is_empty() => Some(self.field(name, v)),
            _ => None,
        }
    }

    pub fn number(&mut self, name: &'static str, value: f64) -> NumberField<'_> {
        NumberField {
            name,
            value,
            errors: &mut self.errors,
        }
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub struct StringField<'v> {
    name: &'static str,
    value: &'v str,
    errors: &'v mut ValidationErrors,
}

impl<'v> StringField<'v> {
    fn check(self, ok: bool, message: &str) -> Self {
        if !ok {
            self.errors.push(self.name, message);
        }
        self
    }

    pub fn min_len(self, min: usize, message: &str) -> Self {
        let ok = self.value.chars().count() >= min;
        self.check(ok, message)
    }

    pub fn max_len(self, max: usize, message: &str) -> Self {
        let ok = self.value.chars().count() <= max;
        self.check(ok, message)
    }

    pub fn required(self, message: &str) -> Self {
        self.min_len(1, message)
    }

    pub fn matches(self, pattern: &Regex, message: &str) -> Self {
        let ok = pattern.is_match(self.value);
        self.check(ok, message)
    }

    pub fn email(self, message: &str) -> Self {
        let ok = EMAIL.is_match(self.value);
        self.check(ok, message)
    }

    pub fn url(self, message: &str) -> Self {
        let ok = url::Url::parse(self.value).is_ok();
        self.check(ok, message)
    }

    pub fn one_of(self, allowed: &[&str], message: &str) -> Self {
        let ok = allowed.contains(&self.value);
        self.check(ok, message)
    }
}

pub struct NumberField<'v> {
    name: &'static str,
    value: f64,
    errors: &'v mut ValidationErrors,
}

impl<'v> NumberField<'v> {
    pub fn min(self, min: f64, message: &str) -> Self {
        if !(self.value >= min) {
            self.errors.push(self.name, message);
        }
        self
    }
}
