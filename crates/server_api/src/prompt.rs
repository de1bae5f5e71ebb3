//! Chat prompt assembly from the client's goal snapshot.

use std::fmt::Write as _;

use shared::domain::Goal;

const GOALS_HEADER: &str = "Here are the user's current saving goals:\n";

/// Renders the goals block followed by the user's question.
///
/// With no goals the block is empty but the blank-line separator stays.
pub fn build_chat_prompt(message: &str, goals: &[Goal]) -> String {
    let mut prompt = goals_context(goals);
    prompt.push_str("\n\nUser question: ");
    prompt.push_str(message);
    prompt
}

pub fn goals_context(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return String::new();
    }

    let mut context = String::from(GOALS_HEADER);
    for goal in goals {
        let _ = writeln!(
            context,
            "- {}: ${} of ${} ({:.1}%)",
            goal.name,
            goal.current_amount,
            goal.target_amount,
            goal.progress_percent()
        );
        let _ = writeln!(context, "  Target date: {}", goal.deadline);
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_goals_is_just_the_question() {
        assert_eq!(
            build_chat_prompt("Any tips?", &[]),
            "\n\nUser question: Any tips?"
        );
    }

    #[test]
    fn prompt_lists_each_goal_with_progress_and_deadline() {
        let goals = vec![
            Goal::new("Vacation", 2000.0, 500.0, "2025-08-01"),
            Goal::new("Bike", 900.0, 300.0, "2025-05-15"),
        ];
        let prompt = build_chat_prompt("How am I doing?", &goals);
        assert_eq!(
            prompt,
            "Here are the user's current saving goals:\n\
             - Vacation: $500 of $2000 (25.0%)\n\
             \x20 Target date: 2025-08-01\n\
             - Bike: $300 of $900 (33.3%)\n\
             \x20 Target date: 2025-05-15\n\
             \n\nUser question: How am I doing?"
        );
    }

    #[test]
    fn fractional_amounts_are_printed_verbatim() {
        let context = goals_context(&[Goal::new("Fund", 1000.5, 250.25, "2026-01-01")]);
        assert!(context.contains("- Fund: $250.25 of $1000.5 (25.0%)"));
    }
}
