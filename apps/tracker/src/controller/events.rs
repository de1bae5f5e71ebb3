//! Diagnostic error modeling for the goal list controller.

use std::fmt;

use client_core::ClientError;

use super::form::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    /// The request never produced a response.
    Transport,
    /// The backend answered with a non-2xx status.
    Rejected,
    /// The response body was not what the client expected.
    Malformed,
    Validation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    LoadGoals,
    SaveGoal,
    DeleteGoal,
    Chat,
}

impl fmt::Display for UiErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UiErrorContext::LoadGoals => "loading goals",
            UiErrorContext::SaveGoal => "saving goal",
            UiErrorContext::DeleteGoal => "deleting goal",
            UiErrorContext::Chat => "sending message",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Status { .. } => UiErrorCategory::Rejected,
            ClientError::Decode { .. } => UiErrorCategory::Malformed,
            ClientError::Transport { .. } | ClientError::InvalidBaseUrl { .. } => {
                UiErrorCategory::Transport
            }
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_form_error(err: &FormError) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context: UiErrorContext::SaveGoal,
            message: err.to_string(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error {}: {}", self.context, self.message)
    }
}
