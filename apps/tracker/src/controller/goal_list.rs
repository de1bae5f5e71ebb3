//! The goal list page controller.
//!
//! Goals are addressed by position, and a position is only meaningful for the
//! fetch that produced it. Every rendered card therefore carries a
//! [`RowHandle`] stamped with the list generation; the generation advances on
//! each successful fetch and on each mutation this controller issues, and any
//! handle from an older generation is refused without touching the network.

use client_core::{ClientError, GoalsApi};
use shared::{
    domain::{Goal, GoalIndex},
    protocol::ChatRequest,
};
use tracing::{debug, error, info, warn};

use super::{
    chat::{ChatMessage, Transcript, FALLBACK_REPLY},
    events::{UiError, UiErrorContext},
    form::{FormError, FormField, FormMode, GoalForm},
};

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this goal?";

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHandle {
    pub index: GoalIndex,
    generation: u64,
}

impl RowHandle {
    #[cfg(test)]
    pub(crate) fn for_test(index: GoalIndex) -> Self {
        Self {
            index,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalCard {
    pub handle: RowHandle,
    pub goal: Goal,
}

impl GoalCard {
    pub fn progress_percent(&self) -> f64 {
        self.goal.progress_percent()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created,
    Updated,
    /// The backend answered with a non-2xx status.
    NotSaved,
    Invalid(FormError),
    /// The edit target belongs to an older list generation.
    StaleTarget,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    NotDeleted,
    StaleRow,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Editing,
    StaleRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    Ignored,
    Answered,
    FellBack,
}

enum Settled {
    Saved,
    Rejected,
    Failed,
}

pub struct GoalListClient<A: GoalsApi> {
    api: A,
    generation: u64,
    cards: Vec<GoalCard>,
    form: GoalForm,
    mode: FormMode,
    transcript: Transcript,
    chat_input: String,
    last_error: Option<UiError>,
}

impl<A: GoalsApi> GoalListClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            generation: 0,
            cards: Vec::new(),
            form: GoalForm::default(),
            mode: FormMode::Adding,
            transcript: Transcript::default(),
            chat_input: String::new(),
            last_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cards(&self) -> &[GoalCard] {
        &self.cards
    }

    /// Handle for the card currently shown at `row`, if any.
    pub fn row(&self, row: usize) -> Option<RowHandle> {
        self.cards.get(row).map(|card| card.handle)
    }

    pub fn form(&self) -> &GoalForm {
        &self.form
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn submit_label(&self) -> &'static str {
        self.mode.submit_label()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn chat_input(&self) -> &str {
        &self.chat_input
    }

    pub fn set_chat_input(&mut self, text: impl Into<String>) {
        self.chat_input = text.into();
    }

    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }

    pub fn is_current(&self, handle: RowHandle) -> bool {
        handle.generation == self.generation
    }

    /// Replaces the rendered list with the backend's current collection.
    /// On failure the previous cards stay in place.
    pub async fn load_goals(&mut self) -> LoadOutcome {
        match self.api.list_goals().await {
            Ok(goals) => {
                self.generation += 1;
                let generation = self.generation;
                self.cards = goals
                    .into_iter()
                    .enumerate()
                    .map(|(index, goal)| GoalCard {
                        handle: RowHandle {
                            index: GoalIndex(index),
                            generation,
                        },
                        goal,
                    })
                    .collect();
                debug!(count = self.cards.len(), generation, "goal list rendered");
                LoadOutcome::Loaded(self.cards.len())
            }
            Err(err) => {
                self.record_error(UiErrorContext::LoadGoals, &err);
                LoadOutcome::Failed
            }
        }
    }

    /// Creates or updates depending on the form mode.
    pub async fn submit_goal(&mut self) -> SubmitOutcome {
        let goal = match self.form.to_goal() {
            Ok(goal) => goal,
            Err(err) => {
                debug!(error = %err, "form constraints not met; nothing submitted");
                self.last_error = Some(UiError::from_form_error(&err));
                return SubmitOutcome::Invalid(err);
            }
        };

        match self.mode {
            FormMode::Adding => {
                let result = self.api.create_goal(&goal).await;
                let outcome = match self.settle_mutation(UiErrorContext::SaveGoal, result) {
                    Settled::Saved => {
                        info!(name = %goal.name, "goal created");
                        self.form.clear();
                        SubmitOutcome::Created
                    }
                    Settled::Rejected => SubmitOutcome::NotSaved,
                    Settled::Failed => return SubmitOutcome::Failed,
                };
                self.load_goals().await;
                outcome
            }
            FormMode::Editing(handle) => {
                if !self.is_current(handle) {
                    warn!(index = %handle.index, "edit target is stale; update not sent");
                    self.mode = FormMode::Adding;
                    return SubmitOutcome::StaleTarget;
                }
                let result = self.api.update_goal(handle.index, &goal).await;
                match self.settle_mutation(UiErrorContext::SaveGoal, result) {
                    Settled::Saved => {
                        info!(index = %handle.index, name = %goal.name, "goal updated");
                        self.reset_form();
                        self.load_goals().await;
                        SubmitOutcome::Updated
                    }
                    Settled::Rejected => {
                        let reloaded = matches!(self.load_goals().await, LoadOutcome::Loaded(_));
                        self.keep_edit_target(handle.index, reloaded);
                        SubmitOutcome::NotSaved
                    }
                    Settled::Failed => {
                        self.keep_edit_target(handle.index, false);
                        SubmitOutcome::Failed
                    }
                }
            }
        }
    }

    // An update replaces in place, so a failed one leaves the target position
    // where it was unless a fresh fetch shows the row is gone.
    fn keep_edit_target(&mut self, index: GoalIndex, reloaded: bool) {
        if reloaded && index.0 >= self.cards.len() {
            warn!(%index, "edit target no longer exists; leaving edit mode");
            self.reset_form();
            return;
        }
        self.mode = FormMode::Editing(RowHandle {
            index,
            generation: self.generation,
        });
    }

    /// Copies the row into the form and makes it the update target.
    pub fn enter_edit_mode(&mut self, handle: RowHandle) -> EditOutcome {
        if !self.is_current(handle) {
            return EditOutcome::StaleRow;
        }
        let Some(card) = self.cards.iter().find(|card| card.handle == handle) else {
            return EditOutcome::StaleRow;
        };
        self.form.fill_from(&card.goal);
        self.mode = FormMode::Editing(handle);
        EditOutcome::Editing
    }

    pub fn reset_form(&mut self) {
        self.form.clear();
        self.mode = FormMode::Adding;
    }

    pub async fn delete_goal(
        &mut self,
        handle: RowHandle,
        confirm: &mut impl Confirm,
    ) -> DeleteOutcome {
        if !self.is_current(handle) {
            warn!(index = %handle.index, "delete target is stale; request not sent");
            return DeleteOutcome::StaleRow;
        }
        if !confirm.confirm(DELETE_CONFIRMATION) {
            return DeleteOutcome::Declined;
        }

        let result = self.api.delete_goal(handle.index).await;
        match self.settle_mutation(UiErrorContext::DeleteGoal, result) {
            Settled::Saved => {
                info!(index = %handle.index, "goal deleted");
                self.load_goals().await;
                DeleteOutcome::Deleted
            }
            Settled::Rejected => DeleteOutcome::NotDeleted,
            Settled::Failed => DeleteOutcome::Failed,
        }
    }

    /// Sends whatever is in the chat input and clears it.
    pub async fn send_chat_input(&mut self) -> ChatOutcome {
        let text = std::mem::take(&mut self.chat_input);
        self.send_message(&text).await
    }

    pub async fn send_message(&mut self, text: &str) -> ChatOutcome {
        let message = text.trim();
        if message.is_empty() {
            return ChatOutcome::Ignored;
        }

        self.transcript.push(ChatMessage::user(message));
        match self.ask_advisor(message).await {
            Ok(reply) => {
                self.transcript.push(ChatMessage::bot(&reply));
                ChatOutcome::Answered
            }
            Err(err) => {
                self.record_error(UiErrorContext::Chat, &err);
                self.transcript.push(ChatMessage::bot(FALLBACK_REPLY));
                ChatOutcome::FellBack
            }
        }
    }

    async fn ask_advisor(&self, message: &str) -> Result<String, ClientError> {
        let goals = self.api.list_goals().await?;
        let request = ChatRequest {
            message: message.to_string(),
            goals,
        };
        Ok(self.api.chat(&request).await?.response)
    }

    // Any issued mutation may shift positions, so outstanding handles are
    // invalidated whether or not it succeeded.
    fn settle_mutation(
        &mut self,
        context: UiErrorContext,
        result: Result<(), ClientError>,
    ) -> Settled {
        self.generation += 1;
        match result {
            Ok(()) => Settled::Saved,
            Err(err) => {
                let rejected = err.is_rejection();
                self.record_error(context, &err);
                if rejected {
                    Settled::Rejected
                } else {
                    Settled::Failed
                }
            }
        }
    }

    fn record_error(&mut self, context: UiErrorContext, err: &ClientError) {
        if err.is_rejection() {
            warn!(%context, error = %err, "backend rejected request");
        } else {
            error!(%context, error = %err, "request failed");
        }
        self.last_error = Some(UiError::from_client_error(context, err));
    }
}

#[cfg(test)]
#[path = "tests/goal_list_tests.rs"]
mod tests;
