//! Line-oriented command loop driving the goal list controller.

use std::{
    fs,
    io::{BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use anyhow::Result;
use client_core::GoalsApi;

use crate::{
    controller::{
        ChatOutcome, Confirm, DeleteOutcome, EditOutcome, FormField, GoalListClient, LoadOutcome,
        SubmitOutcome,
    },
    ui::{console, html},
};

pub const HELP: &str = "\
Commands:
  list                   reload goals from the server
  set <field> <value>    fill a form field (name, target, current, deadline)
  submit                 add the goal, or update the one being edited
  reset                  clear the form and leave edit mode
  edit <row>             load a goal into the form for updating
  delete <row>           delete a goal (asks for confirmation)
  chat <text>            ask the savings advisor
  show                   print goals, form and chat
  html [path]            render the page as HTML to stdout or a file
  help                   show this help
  quit                   exit
";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Set(FormField, String),
    Submit,
    Reset,
    Edit(usize),
    Delete(usize),
    Chat(String),
    Show,
    Html(Option<PathBuf>),
    Help,
    Quit,
}

fn parse_row(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("expected a row number, got '{}'", raw.trim()))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" => Ok(Command::List),
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("usage: set <field> <value>".to_string());
                }
                Ok(Command::Set(field.parse()?, value.trim().to_string()))
            }
            "submit" => Ok(Command::Submit),
            "reset" => Ok(Command::Reset),
            "edit" => Ok(Command::Edit(parse_row(rest)?)),
            "delete" | "rm" => Ok(Command::Delete(parse_row(rest)?)),
            "chat" => Ok(Command::Chat(rest.to_string())),
            "show" => Ok(Command::Show),
            "html" => Ok(Command::Html((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(format!("unknown command '{other}'; type 'help'")),
        }
    }
}

/// Asks on the terminal, reading the answer from the same input as commands.
struct PromptConfirm<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<'_, R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        let _ = write!(self.output, "{prompt} [y/N] ");
        let _ = self.output.flush();
        let mut answer = String::new();
        if self.input.read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

pub async fn run<A, R, W>(
    client: &mut GoalListClient<A>,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    A: GoalsApi,
    R: BufRead,
    W: Write,
{
    writeln!(output, "Type 'help' for commands.")?;
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                writeln!(output, "{message}")?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        execute(client, command, input, output).await?;
    }
    Ok(())
}

async fn execute<A, R, W>(
    client: &mut GoalListClient<A>,
    command: Command,
    input: &mut R,
    output: &mut W,
) -> Result<()>
where
    A: GoalsApi,
    R: BufRead,
    W: Write,
{
    match command {
        Command::List => match client.load_goals().await {
            LoadOutcome::Loaded(_) => {
                write!(output, "{}", console::render_goal_list(client.cards()))?
            }
            LoadOutcome::Failed => {
                if let Some(err) = client.last_error() {
                    writeln!(output, "{err}")?;
                }
            }
        },
        Command::Set(field, value) => client.set_field(field, value),
        Command::Submit => match client.submit_goal().await {
            SubmitOutcome::Created => writeln!(output, "Goal added.")?,
            SubmitOutcome::Updated => writeln!(output, "Goal updated.")?,
            SubmitOutcome::Invalid(err) => writeln!(output, "Cannot submit: {err}")?,
            SubmitOutcome::StaleTarget => writeln!(
                output,
                "The goal being edited may have moved; run 'list' and edit it again."
            )?,
            SubmitOutcome::NotSaved | SubmitOutcome::Failed => {}
        },
        Command::Reset => client.reset_form(),
        Command::Edit(row) => {
            let Some(handle) = client.row(row) else {
                writeln!(output, "No goal at row {row}.")?;
                return Ok(());
            };
            match client.enter_edit_mode(handle) {
                EditOutcome::Editing => write!(output, "{}", console::render_form(client))?,
                EditOutcome::StaleRow => {
                    writeln!(output, "Row {row} is out of date; run 'list' first.")?
                }
            }
        }
        Command::Delete(row) => {
            let Some(handle) = client.row(row) else {
                writeln!(output, "No goal at row {row}.")?;
                return Ok(());
            };
            let mut confirm = PromptConfirm {
                input: &mut *input,
                output: &mut *output,
            };
            match client.delete_goal(handle, &mut confirm).await {
                DeleteOutcome::Deleted => writeln!(output, "Goal deleted.")?,
                DeleteOutcome::StaleRow => {
                    writeln!(output, "Row {row} is out of date; run 'list' first.")?
                }
                DeleteOutcome::Declined | DeleteOutcome::NotDeleted | DeleteOutcome::Failed => {}
            }
        }
        Command::Chat(text) => {
            client.set_chat_input(text);
            match client.send_chat_input().await {
                ChatOutcome::Ignored => {}
                ChatOutcome::Answered | ChatOutcome::FellBack => {
                    if let Some(reply) = client.transcript().messages().last() {
                        write!(output, "{}", console::render_message(reply))?;
                    }
                }
            }
        }
        Command::Show => write!(output, "{}", console::render_page(client))?,
        Command::Html(None) => write!(output, "{}", html::render_page(client))?,
        Command::Html(Some(path)) => {
            match fs::write(&path, html::render_page(client)) {
                Ok(()) => writeln!(output, "Wrote {}", path.display())?,
                Err(err) => writeln!(output, "Could not write {}: {err}", path.display())?,
            }
        }
        Command::Help => write!(output, "{HELP}")?,
        Command::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
