//! Plain-text view of the goal page for the terminal.

use std::fmt::Write as _;

use client_core::GoalsApi;

use crate::controller::{ChatMessage, FormField, FormMode, GoalCard, GoalListClient, Sender};

const BAR_WIDTH: usize = 20;

fn progress_bar(percent: f64) -> String {
    let filled = if percent.is_finite() {
        ((percent.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn render_goal_card(row: usize, card: &GoalCard) -> String {
    let goal = &card.goal;
    let percent = card.progress_percent();
    format!(
        "[{row}] {}\n    Target: ${}  Current: ${}  Deadline: {}\n    {} {percent:.1}%\n",
        goal.name,
        goal.target_amount,
        goal.current_amount,
        goal.deadline,
        progress_bar(percent),
    )
}

pub fn render_goal_list(cards: &[GoalCard]) -> String {
    if cards.is_empty() {
        return "No goals yet.\n".to_string();
    }
    cards
        .iter()
        .enumerate()
        .map(|(row, card)| render_goal_card(row, card))
        .collect()
}

pub fn render_message(message: &ChatMessage) -> String {
    let prefix = match message.sender {
        Sender::User => "you: ",
        Sender::Bot => "bot: ",
    };
    let mut out = String::new();
    for (i, line) in message.lines.iter().enumerate() {
        let lead = if i == 0 { prefix } else { "     " };
        let _ = writeln!(out, "{lead}{line}");
    }
    out
}

pub fn render_form<A: GoalsApi>(client: &GoalListClient<A>) -> String {
    let mut out = match client.mode() {
        FormMode::Adding => format!("Form [{}]\n", client.submit_label()),
        FormMode::Editing(handle) => {
            format!("Form [{}] editing row {}\n", client.submit_label(), handle.index)
        }
    };
    for field in FormField::ALL {
        let _ = writeln!(out, "  {field}: {}", client.form().field(field));
    }
    out
}

pub fn render_page<A: GoalsApi>(client: &GoalListClient<A>) -> String {
    let mut out = String::from("== Goals ==\n");
    out.push_str(&render_goal_list(client.cards()));
    out.push('\n');
    out.push_str(&render_form(client));
    if !client.transcript().is_empty() {
        out.push_str("\n== Chat ==\n");
        for message in client.transcript().messages() {
            out.push_str(&render_message(message));
        }
    }
    if let Some(err) = client.last_error() {
        let _ = writeln!(out, "\nLast error: {err}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::goal_list::RowHandle;
    use shared::domain::{Goal, GoalIndex};

    #[test]
    fn bar_fills_proportionally_and_clamps() {
        assert_eq!(progress_bar(0.0), format!("[{}]", "-".repeat(20)));
        assert_eq!(progress_bar(50.0), format!("[{}{}]", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(250.0), format!("[{}]", "#".repeat(20)));
        assert_eq!(progress_bar(f64::NAN), format!("[{}]", "-".repeat(20)));
    }

    #[test]
    fn card_lists_row_amounts_and_percentage() {
        let card = GoalCard {
            handle: RowHandle::for_test(GoalIndex(0)),
            goal: Goal::new("Vacation", 2000.0, 500.0, "2025-08-01"),
        };
        let text = render_goal_card(2, &card);
        assert!(text.starts_with("[2] Vacation\n"));
        assert!(text.contains("Target: $2000  Current: $500  Deadline: 2025-08-01"));
        assert!(text.contains("25.0%"));
    }

    #[test]
    fn bot_lines_are_indented_under_the_prefix() {
        let text = render_message(&ChatMessage::bot("Great job!\nKeep going."));
        assert_eq!(text, "bot: Great job!\n     Keep going.\n");
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(render_goal_list(&[]), "No goals yet.\n");
    }
}
