use serde::{Deserialize, Serialize};

use crate::domain::{Goal, GoalIndex};

pub const GOALS_ROUTE: &str = "/api/goals";
pub const CHAT_ROUTE: &str = "/api/chat";

pub fn goal_route(index: GoalIndex) -> String {
    format!("{GOALS_ROUTE}/{index}")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub response: String,
}
