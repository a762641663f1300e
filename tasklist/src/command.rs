//! Line commands for the terminal front end.
//!
//! Each line typed at the prompt parses into a [`Command`]; [`execute`] maps
//! it onto the page's intents. Rows are addressed by their 1-based position
//! in the currently visible list, the way they are numbered on screen.

use crate::app::TaskApp;
use crate::types::{Filter, ParseFilterError, TaskId};
use std::str::FromStr;
use tasklist_runtime::StoreError;
use thiserror::Error;

/// Command reference printed by `help`
pub const HELP: &str = "\
Commands:
  add <text>                   add a task
  toggle <row>                 mark the task at <row> done / not done
  delete <row>                 delete the task at <row>
  filter <all|active|done>     choose which tasks are shown
  show                         show the page again
  help                         show this help
  quit                         leave (also: exit, end of input)";

/// One parsed input line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Type the text into the input field and submit it
    Add(String),
    /// Toggle the task at a visible row
    Toggle(usize),
    /// Delete the task at a visible row
    Delete(usize),
    /// Select a filter
    Filter(Filter),
    /// Render the page again
    Show,
    /// Print [`HELP`]
    Help,
    /// Leave the prompt
    Quit,
}

/// Errors for commands that cannot be carried out
///
/// None of them change state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Blank line
    #[error("Type a command, or `help` for the list")]
    Empty,

    /// First word names no command
    #[error("Unknown command {0:?}; type `help` for the list")]
    Unknown(String),

    /// Command needs an argument that was not given
    #[error("`{0}` needs an argument; type `help` for usage")]
    MissingArgument(&'static str),

    /// Row argument is not a positive number
    #[error("{0:?} is not a row number")]
    InvalidRow(String),

    /// Row number is past the end of the visible list
    #[error("There is no row {0}")]
    NoSuchRow(usize),

    /// Filter argument names no filter
    #[error(transparent)]
    InvalidFilter(#[from] ParseFilterError),

    /// The store rejected the intent
    #[error("Could not apply command: {0}")]
    Store(#[from] StoreError),
}

/// What the prompt should do after a command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State changed (or may have); the render callback already ran
    Applied,
    /// Render the page explicitly
    Show,
    /// Print [`HELP`]
    Help,
    /// Leave the prompt
    Quit,
}

fn parse_row(arg: &str) -> Result<usize, CommandError> {
    match arg.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::InvalidRow(arg.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        let required = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest)
            }
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "add" => Ok(Self::Add(required("add")?.to_string())),
            "toggle" => parse_row(required("toggle")?).map(Self::Toggle),
            "delete" => parse_row(required("delete")?).map(Self::Delete),
            "filter" => Ok(Self::Filter(required("filter")?.parse()?)),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// Carries out `command` against `app`
///
/// # Errors
///
/// - [`CommandError::NoSuchRow`] if a row is not currently visible
/// - [`CommandError::Store`] if the store rejects the intent
pub fn execute(app: &TaskApp, command: Command) -> Result<Outcome, CommandError> {
    tracing::debug!(?command, "Executing command");

    match command {
        Command::Add(text) => app.enter_input(text)?,
        Command::Toggle(row) => app.toggle(visible_id(app, row)?)?,
        Command::Delete(row) => app.delete(visible_id(app, row)?)?,
        Command::Filter(filter) => app.select_filter(filter)?,
        Command::Show => return Ok(Outcome::Show),
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
    }

    Ok(Outcome::Applied)
}

fn visible_id(app: &TaskApp, row: usize) -> Result<TaskId, CommandError> {
    app.view()
        .list
        .row(row)
        .map(|item| item.id)
        .ok_or(CommandError::NoSuchRow(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::AppEnvironment;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::Arc;
    use tasklist_testing::{MemoryStorage, SequentialIds};

    fn app() -> TaskApp {
        TaskApp::open(AppEnvironment::new(
            Arc::new(SequentialIds::default()),
            Arc::new(MemoryStorage::new()),
        ))
    }

    #[test]
    fn parses_commands() {
        assert_eq!("add  Buy milk ".parse::<Command>(), Ok(Command::Add("Buy milk".to_string())));
        assert_eq!("TOGGLE 2".parse::<Command>(), Ok(Command::Toggle(2)));
        assert_eq!("delete 1".parse::<Command>(), Ok(Command::Delete(1)));
        assert_eq!("filter completed".parse::<Command>(), Ok(Command::Filter(Filter::Done)));
        assert_eq!("show".parse::<Command>(), Ok(Command::Show));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!("   ".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("add".parse::<Command>(), Err(CommandError::MissingArgument("add")));
        assert_eq!(
            "toggle 0".parse::<Command>(),
            Err(CommandError::InvalidRow("0".to_string()))
        );
        assert_eq!(
            "delete x".parse::<Command>(),
            Err(CommandError::InvalidRow("x".to_string()))
        );
        assert!(matches!(
            "filter later".parse::<Command>(),
            Err(CommandError::InvalidFilter(_))
        ));
        assert_eq!(
            "frobnicate".parse::<Command>(),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn rows_address_the_visible_list() {
        let app = app();
        execute(&app, Command::Add("A".to_string())).unwrap();
        execute(&app, Command::Add("B".to_string())).unwrap();
        execute(&app, Command::Toggle(1)).unwrap();
        execute(&app, Command::Filter(Filter::Active)).unwrap();

        // Only "A" is visible now, at row 1
        execute(&app, Command::Delete(1)).unwrap();
        let texts: Vec<_> = app.todos().iter().map(|t| t.text.clone()).collect();
        assert_eq!(texts, ["B"]);
    }

    #[test]
    fn each_command_renders_once() {
        let app = app();
        let renders = Rc::new(Cell::new(0));
        let counter = Rc::clone(&renders);
        app.on_render(move |_| counter.set(counter.get() + 1));

        execute(&app, Command::Add("Buy milk".to_string())).unwrap();
        assert_eq!(renders.get(), 1);
        execute(&app, Command::Toggle(1)).unwrap();
        execute(&app, Command::Filter(Filter::Done)).unwrap();
        execute(&app, Command::Delete(1)).unwrap();
        assert_eq!(renders.get(), 4);
    }

    #[test]
    fn missing_row_changes_nothing() {
        let app = app();
        execute(&app, Command::Add("A".to_string())).unwrap();
        assert_eq!(
            execute(&app, Command::Toggle(2)),
            Err(CommandError::NoSuchRow(2))
        );
        assert_eq!(app.summary().done, 0);
    }

    #[test]
    fn non_state_commands_report_outcome() {
        let app = app();
        assert_eq!(execute(&app, Command::Show), Ok(Outcome::Show));
        assert_eq!(execute(&app, Command::Help), Ok(Outcome::Help));
        assert_eq!(execute(&app, Command::Quit), Ok(Outcome::Quit));
    }
}
