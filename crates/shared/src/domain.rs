use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! index_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// 0-based offset into the most recently fetched goal collection.
index_newtype!(GoalIndex);

/// A savings goal as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    /// Displayed verbatim; never parsed.
    pub deadline: String,
}

impl Goal {
    pub fn new(
        name: impl Into<String>,
        target_amount: f64,
        current_amount: f64,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_amount,
            current_amount,
            deadline: deadline.into(),
        }
    }

    /// Unclamped completion percentage. A zero target yields an infinite or NaN value.
    pub fn progress_percent(&self) -> f64 {
        (self.current_amount / self.target_amount) * 100.0
    }
}
