//! Keystroke-level numeric input handling for the parameter form.
//!
//! Text is accepted while it still has the shape of a single decimal number
//! (`-`, digits, one `.` or `,` separator). Coercion to `f64` happens only when
//! the form is resolved for submission.

use crate::domain::{ConsoleError, InputResult, ParameterField, ParameterRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Accepted(String),
    Rejected,
}

impl EditState {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

pub fn accept(raw: &str) -> EditState {
    if is_numeric_shape(raw) {
        EditState::Accepted(raw.to_string())
    } else {
        EditState::Rejected
    }
}

pub fn finalize(text: &str) -> InputResult<f64> {
    let normalized = text.trim().replace(',', ".");
    let value = normalized.parse::<f64>().map_err(|_| {
        ConsoleError::input_validation(
            "INPUT.NUMBER_UNPARSEABLE",
            format!("'{}' is not a complete number", text),
        )
    })?;
    if !value.is_finite() {
        return Err(ConsoleError::input_validation(
            "INPUT.NUMBER_NOT_FINITE",
            format!("'{}' is out of range", text),
        ));
    }
    Ok(value)
}

fn is_numeric_shape(raw: &str) -> bool {
    let body = raw.strip_prefix('-').unwrap_or(raw);
    let mut separators = 0;
    for character in body.chars() {
        match character {
            '0'..='9' => {}
            '.' | ',' => {
                separators += 1;
                if separators > 1 {
                    return false;
                }
            }
            _ => return false,
        }
    }
    true
}

/// Edit state of one form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Unset,
    InProgress(String),
    Valid(f64),
}

impl FieldValue {
    /// Applies a keystroke. Rejected text leaves the value untouched.
    pub fn edit(&mut self, raw: &str) -> EditState {
        let state = accept(raw);
        if let EditState::Accepted(text) = &state {
            *self = if text.is_empty() {
                Self::Unset
            } else {
                Self::InProgress(text.clone())
            };
        }
        state
    }

    pub fn resolve(&self) -> InputResult<f64> {
        match self {
            Self::Valid(value) => Ok(*value),
            Self::InProgress(text) => finalize(text),
            Self::Unset => Err(ConsoleError::input_validation(
                "INPUT.NUMBER_UNSET",
                "value is empty",
            )),
        }
    }

    pub fn display_text(&self) -> String {
        match self {
            Self::Unset => String::new(),
            Self::InProgress(text) => text.clone(),
            Self::Valid(value) => value.to_string(),
        }
    }
}

static UNSET: FieldValue = FieldValue::Unset;

/// Editable parameter set; resolves into a `ParameterRecord` for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterForm {
    values: HashMap<ParameterField, FieldValue>,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self::from_record(&ParameterRecord::default())
    }
}

impl ParameterForm {
    pub fn from_record(record: &ParameterRecord) -> Self {
        let values = record
            .entries()
            .map(|(field, value)| (field, FieldValue::Valid(value)))
            .collect();
        Self { values }
    }

    pub fn value(&self, field: ParameterField) -> &FieldValue {
        self.values.get(&field).unwrap_or(&UNSET)
    }

    pub fn edit(&mut self, field: ParameterField, raw: &str) -> EditState {
        self.values
            .entry(field)
            .or_insert(FieldValue::Unset)
            .edit(raw)
    }

    pub fn set(&mut self, field: ParameterField, value: f64) {
        self.values.insert(field, FieldValue::Valid(value));
    }

    /// Overwrites every field with the values of `record`.
    pub fn load(&mut self, record: &ParameterRecord) {
        for (field, value) in record.entries() {
            self.set(field, value);
        }
    }

    pub fn resolve(&self) -> InputResult<ParameterRecord> {
        let mut record = ParameterRecord::default();
        for field in ParameterField::ALL {
            let value = self.value(field).resolve().map_err(|source| {
                ConsoleError::input_validation(
                    "INPUT.FIELD_UNRESOLVED",
                    format!("field '{}': {}", field.label(), source.message()),
                )
            })?;
            record.set(field, value);
        }
        Ok(record)
    }
}
