//! The goal form: raw field text, submit-time constraints and the add/edit mode.

use std::{fmt, str::FromStr};

use shared::domain::Goal;
use thiserror::Error;

use super::goal_list::RowHandle;

pub const ADD_LABEL: &str = "Add Goal";
pub const UPDATE_LABEL: &str = "Update Goal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    TargetAmount,
    CurrentAmount,
    Deadline,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Name,
        FormField::TargetAmount,
        FormField::CurrentAmount,
        FormField::Deadline,
    ];
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Name => "name",
            FormField::TargetAmount => "target amount",
            FormField::CurrentAmount => "current amount",
            FormField::Deadline => "deadline",
        };
        f.write_str(label)
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "goalname" => Ok(FormField::Name),
            "target" | "targetamount" => Ok(FormField::TargetAmount),
            "current" | "currentamount" => Ok(FormField::CurrentAmount),
            "deadline" => Ok(FormField::Deadline),
            other => Err(format!(
                "unknown field '{other}' (expected name, target, current or deadline)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(FormField),
    #[error("{field} must be a number, got '{value}'")]
    NotANumber { field: FormField, value: String },
    #[error("{field} must be {constraint}")]
    OutOfRange {
        field: FormField,
        constraint: &'static str,
    },
}

/// Whether submitting creates a goal or replaces the one a row handle points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Adding,
    Editing(RowHandle),
}

impl FormMode {
    pub fn submit_label(&self) -> &'static str {
        match self {
            FormMode::Adding => ADD_LABEL,
            FormMode::Editing(_) => UPDATE_LABEL,
        }
    }
}

/// Field values exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    pub deadline: String,
}

impl GoalForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::TargetAmount => &self.target_amount,
            FormField::CurrentAmount => &self.current_amount,
            FormField::Deadline => &self.deadline,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::TargetAmount => self.target_amount = value,
            FormField::CurrentAmount => self.current_amount = value,
            FormField::Deadline => self.deadline = value,
        }
    }

    pub fn fill_from(&mut self, goal: &Goal) {
        self.name = goal.name.clone();
        self.target_amount = goal.target_amount.to_string();
        self.current_amount = goal.current_amount.to_string();
        self.deadline = goal.deadline.clone();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Applies the form constraints and builds the goal to submit.
    pub fn to_goal(&self) -> Result<Goal, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Missing(FormField::Name));
        }
        let target_amount = parse_amount(FormField::TargetAmount, &self.target_amount)?;
        if target_amount <= 0.0 {
            return Err(FormError::OutOfRange {
                field: FormField::TargetAmount,
                constraint: "greater than zero",
            });
        }
        let current_amount = parse_amount(FormField::CurrentAmount, &self.current_amount)?;
        if current_amount < 0.0 {
            return Err(FormError::OutOfRange {
                field: FormField::CurrentAmount,
                constraint: "zero or more",
            });
        }
        if self.deadline.trim().is_empty() {
            return Err(FormError::Missing(FormField::Deadline));
        }

        Ok(Goal {
            name: self.name.clone(),
            target_amount,
            current_amount,
            deadline: self.deadline.clone(),
        })
    }
}

fn parse_amount(field: FormField, raw: &str) -> Result<f64, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::Missing(field));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}
