use std::sync::Arc;

use shared::{
    domain::{Goal, GoalIndex},
    error::{ApiError, ErrorCode},
    protocol::{ChatRequest, ChatResponse},
};
use storage::Storage;
use tracing::{error, info};

pub mod advisor;
pub mod prompt;

pub use advisor::{ChatAdvisor, GeminiAdvisor, GeminiConfig, MissingChatAdvisor};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub advisor: Arc<dyn ChatAdvisor>,
}

pub async fn list_goals(ctx: &ApiContext) -> Result<Vec<Goal>, ApiError> {
    ctx.storage.list_goals().await.map_err(internal)
}

pub async fn create_goal(ctx: &ApiContext, goal: Goal) -> Result<GoalIndex, ApiError> {
    let index = ctx.storage.append_goal(&goal).await.map_err(internal)?;
    info!(%index, name = %goal.name, "goal created");
    Ok(index)
}

pub async fn update_goal(ctx: &ApiContext, index: GoalIndex, goal: Goal) -> Result<(), ApiError> {
    let replaced = ctx
        .storage
        .replace_goal_at(index, &goal)
        .await
        .map_err(internal)?;
    if !replaced {
        return Err(goal_not_found());
    }
    info!(%index, name = %goal.name, "goal updated");
    Ok(())
}

pub async fn delete_goal(ctx: &ApiContext, index: GoalIndex) -> Result<(), ApiError> {
    let removed = ctx.storage.remove_goal_at(index).await.map_err(internal)?;
    if !removed {
        return Err(goal_not_found());
    }
    info!(%index, "goal deleted");
    Ok(())
}

/// Answers a chat message using the goals the client sent along with it.
pub async fn chat(ctx: &ApiContext, request: ChatRequest) -> Result<ChatResponse, ApiError> {
    let prompt = prompt::build_chat_prompt(&request.message, &request.goals);
    tracing::debug!(goals = request.goals.len(), "forwarding chat prompt to advisor");
    let response = ctx.advisor.advise(&prompt).await.map_err(|e| {
        error!(error = %e, "chat advisor failed");
        ApiError::new(ErrorCode::Unavailable, e.to_string())
    })?;
    Ok(ChatResponse { response })
}

fn goal_not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "Goal not found")
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
