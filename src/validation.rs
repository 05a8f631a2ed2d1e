//! Validation - structural and uniqueness rules checked before any commit.
//!
//! Rules never short-circuit: every failing field is reported, in a fixed
//! order, so a client can fix a request in one round trip.
//!
//! ## Example
//!
//! ```ignore
//! use villa_api::{validate_for_create, Villa};
//!
//! let existing = vec![];
//! let errors = validate_for_create(&existing, &Villa::new("", 100.0, 0, 2));
//! assert!(errors.contains_field("name"));
//! assert!(errors.contains_field("sqft"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::villa::Villa;

pub const NAME_MAX_CHARS: usize = 30;
pub const DETAILS_MAX_CHARS: usize = 500;
pub const IMAGE_URL_MAX_CHARS: usize = 2048;

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered list of failed rules. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when no rule failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a record that is about to be inserted.
pub fn validate_for_create(existing: &[Villa], villa: &Villa) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_fields(villa, &mut errors);
    check_name_unique(existing, villa, None, &mut errors);
    errors
}

/// Check the candidate that would replace the record at `id`.
///
/// The record currently stored at `id` may share the candidate's name.
pub fn validate_for_update(existing: &[Villa], id: i64, villa: &Villa) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    check_fields(villa, &mut errors);
    check_name_unique(existing, villa, Some(id), &mut errors);
    errors
}

fn check_fields(villa: &Villa, errors: &mut ValidationErrors) {
    if villa.name.trim().is_empty() {
        errors.push("name", "name is required");
    } else if villa.name.chars().count() > NAME_MAX_CHARS {
        errors.push(
            "name",
            format!("name must be at most {} characters", NAME_MAX_CHARS),
        );
    }

    if let Some(details) = &villa.details {
        if details.chars().count() > DETAILS_MAX_CHARS {
            errors.push(
                "details",
                format!("details must be at most {} characters", DETAILS_MAX_CHARS),
            );
        }
    }

    if !villa.rate.is_finite() || villa.rate < 0.0 {
        errors.push("rate", "rate must be a non-negative number");
    }
    if villa.sqft <= 0 {
        errors.push("sqft", "sqft must be a positive integer");
    }
    if villa.occupancy <= 0 {
        errors.push("occupancy", "occupancy must be a positive integer");
    }

    if let Some(url) = &villa.image_url {
        if url.chars().count() > IMAGE_URL_MAX_CHARS {
            errors.push(
                "imageUrl",
                format!("imageUrl must be at most {} characters", IMAGE_URL_MAX_CHARS),
            );
        }
    }
}

fn check_name_unique(
    existing: &[Villa],
    villa: &Villa,
    exempt: Option<i64>,
    errors: &mut ValidationErrors,
) {
    let key = villa.name_key();
    if key.is_empty() {
        return;
    }
    let taken = existing
        .iter()
        .filter(|other| Some(other.id) != exempt)
        .any(|other| other.name_key() == key);
    if taken {
        errors.push("name", format!("a villa named '{}' already exists", villa.name.trim()));
    }
}
