//! Validation framework with field-level error collection
//!
//! Rules never short-circuit: a failed validation reports every violated
//! rule so the caller can fix all of them in one round trip.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Field or parameter the rule applies to
    pub field: String,
    /// Stable machine-readable rule code (e.g. "sources.count")
    pub code: String,
    pub message: String,
}

/// Validation error carrying every violated rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self { violations: Vec::new() }
    }

    /// Add a violation for the given field.
    pub fn add(
        &mut self,
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.violations.push(FieldViolation {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations recorded against one field.
    pub fn field_violations(&self, field: &str) -> Vec<&FieldViolation> {
        self.violations.iter().filter(|v| v.field == field).collect()
    }

    /// Whether any violation carries the given rule code.
    pub fn has_code(&self, code: &str) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }

    /// Turn collected violations into a Result; `Ok` when nothing failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Fold another error's violations into this one.
    pub fn merge(&mut self, other: ValidationError) {
        self.violations.extend(other.violations);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "validation failed");
        }
        write!(f, "validation failed: ")?;
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
