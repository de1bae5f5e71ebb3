//! Controller layer: goal list state, form and chat transcript, and the
//! operations that drive them against the goals backend.

pub mod chat;
pub mod events;
pub mod form;
pub mod goal_list;

pub use chat::{ChatMessage, Sender};
pub use form::{FormField, FormMode};
pub use goal_list::{
    ChatOutcome, Confirm, DeleteOutcome, EditOutcome, GoalCard, GoalListClient, LoadOutcome,
    SubmitOutcome,
};
