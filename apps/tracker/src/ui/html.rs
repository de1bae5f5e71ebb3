//! HTML rendering of the goal page. Every interpolated value is escaped;
//! bot line breaks are emitted as `<br>` between escaped segments.

use std::fmt::Write as _;

use client_core::GoalsApi;

use crate::controller::{ChatMessage, FormField, GoalCard, GoalListClient};

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_goal_card(card: &GoalCard) -> String {
    let goal = &card.goal;
    let index = card.handle.index;
    format!(
        concat!(
            "<div class=\"goal-card\">\n",
            "  <div class=\"goal-header\">\n",
            "    <h3>{name}</h3>\n",
            "    <div class=\"goal-actions\">\n",
            "      <button class=\"edit-goal\" data-index=\"{index}\">Edit</button>\n",
            "      <button class=\"delete-goal\" data-index=\"{index}\">Delete</button>\n",
            "    </div>\n",
            "  </div>\n",
            "  <p>Target: ${target}</p>\n",
            "  <p>Current: ${current}</p>\n",
            "  <p>Deadline: {deadline}</p>\n",
            "  <div class=\"progress-bar\">\n",
            "    <div class=\"progress\" style=\"width: {progress}%\"></div>\n",
            "  </div>\n",
            "</div>\n",
        ),
        name = escape_html(&goal.name),
        index = index,
        target = goal.target_amount,
        current = goal.current_amount,
        deadline = escape_html(&goal.deadline),
        progress = card.progress_percent(),
    )
}

pub fn render_goal_list(cards: &[GoalCard]) -> String {
    let mut out = String::from("<div id=\"goalsContainer\">\n");
    for card in cards {
        out.push_str(&render_goal_card(card));
    }
    out.push_str("</div>\n");
    out
}

pub fn render_message(message: &ChatMessage) -> String {
    let body = message
        .lines
        .iter()
        .map(|line| escape_html(line))
        .collect::<Vec<_>>()
        .join("<br>");
    format!(
        "<div class=\"message {}\">{body}</div>\n",
        message.sender.css_class()
    )
}

pub fn render_transcript(messages: &[ChatMessage]) -> String {
    let mut out = String::from("<div id=\"chatMessages\">\n");
    for message in messages {
        out.push_str(&render_message(message));
    }
    out.push_str("</div>\n");
    out
}

fn render_form<A: GoalsApi>(client: &GoalListClient<A>) -> String {
    let mut out = String::from("<form id=\"goalForm\">\n");
    for field in FormField::ALL {
        let (id, kind) = match field {
            FormField::Name => ("goalName", "text"),
            FormField::TargetAmount => ("targetAmount", "number"),
            FormField::CurrentAmount => ("currentAmount", "number"),
            FormField::Deadline => ("deadline", "date"),
        };
        let _ = writeln!(
            out,
            "  <input id=\"{id}\" type=\"{kind}\" value=\"{}\" required>",
            escape_html(client.form().field(field))
        );
    }
    let _ = writeln!(
        out,
        "  <button type=\"submit\">{}</button>",
        escape_html(client.submit_label())
    );
    out.push_str("</form>\n");
    out
}

/// Renders the whole page as a standalone document.
pub fn render_page<A: GoalsApi>(client: &GoalListClient<A>) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Financial Goals</title>\n</head>\n<body>\n",
    );
    out.push_str(&render_form(client));
    out.push_str(&render_goal_list(client.cards()));
    out.push_str(&render_transcript(client.transcript().messages()));
    let _ = writeln!(
        out,
        "<input id=\"userMessage\" type=\"text\" value=\"{}\">",
        escape_html(client.chat_input())
    );
    out.push_str("</body>\n</html>\n");
    out
}
