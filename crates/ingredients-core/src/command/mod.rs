//! Text command protocol.
//!
//! A command is a `;`-separated chain of subcommands, matched
//! case-insensitively after trimming:
//!
//! - `l|left|r|right [N]` scroll N places (default 1)
//! - `cycle` step through every ingredient once
//! - `find <ingredient>` scroll right until the ingredient is displayed
//! - `add` add the displayed ingredient
//! - `add <ingredient>, <ingredient>, ...` find and add each ingredient
//! - `reset` press the reset button
//! - `press egg|fire|knife|pepper on <digit>` press a technique once the timer shows the digit
//!
//! Parsing happens one subcommand at a time as the [`CommandInterpreter`]
//! reaches it, so an error late in a chain leaves earlier effects in place.

mod interpreter;

pub use interpreter::{CommandInterpreter, InterpreterConfig, Step};

use crate::catalog::Technique;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Usage text for the command protocol
pub const HELP_MESSAGE: &str = "Scroll through ingredients with \"l/r/left/right <#>\" (number is optional), \"cycle\", or \"find <ingredient>\".  Add the ingredient shown with \"add\", or any ingredient(s) with \"add <ingredient1>, <ingredient2>, ...\".  Reset the module with \"reset\".  Choose a technique with \"press egg/fire/knife/pepper on <#>\".  Commands can be chained with semicolons.  Ingredients are case-insensitive, but must otherwise match exactly.";

/// How a command failure should be surfaced to whoever sent it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The command was malformed
    Parse,
    /// A `find` target is not on the list
    NotFound,
    /// An `add` target is not on the list; carries a penalty
    Penalty,
    /// Nothing in the grammar matched
    Unrecognized,
}

/// Why a command chain stopped early
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("I couldn't parse the distance \"{0}\".")]
    InvalidDistance(String),

    #[error("Unable to find ingredient \"{0}\".")]
    IngredientNotFound(String),

    #[error("Unable to find ingredient \"{0}\".")]
    AddTargetNotFound(String),

    #[error("Unable to recognize command \"{0}\".")]
    Unrecognized(String),
}

impl CommandError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CommandError::InvalidDistance(_) => ErrorClass::Parse,
            CommandError::IngredientNotFound(_) => ErrorClass::NotFound,
            CommandError::AddTargetNotFound(_) => ErrorClass::Penalty,
            CommandError::Unrecognized(_) => ErrorClass::Unrecognized,
        }
    }

    pub fn is_penalty(&self) -> bool {
        self.class() == ErrorClass::Penalty
    }
}

/// Scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// One parsed element of a command chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subcommand {
    Scroll { direction: Direction, distance: usize },
    Cycle,
    Find(String),
    AddCurrent,
    AddList(Vec<String>),
    Reset,
    Press { technique: Technique, digit: char },
}

struct Patterns {
    scroll: Regex,
    find: Regex,
    add_list: Regex,
    press: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        scroll: Regex::new(r"^(l|left|r|right)(\s+\d+)?$").expect("valid scroll pattern"),
        find: Regex::new(r"^find (.+)$").expect("valid find pattern"),
        add_list: Regex::new(r"^add (.+)$").expect("valid add pattern"),
        press: Regex::new(r"^press (egg|fire|knife|pepper) on ([0-9])$").expect("valid press pattern"),
    })
}

/// Split a chain into normalized (trimmed, lowercase) subcommands
pub fn split_chain(command: &str) -> Vec<String> {
    command
        .split(';')
        .map(|part| part.trim().to_lowercase())
        .collect()
}

/// Parse one normalized subcommand
pub fn parse_subcommand(command: &str) -> Result<Subcommand, CommandError> {
    let patterns = patterns();

    if let Some(caps) = patterns.scroll.captures(command) {
        let direction = if caps[1].starts_with('l') {
            Direction::Left
        } else {
            Direction::Right
        };
        let distance = match caps.get(2) {
            Some(raw) => {
                let raw = raw.as_str().trim();
                raw.parse::<usize>()
                    .map_err(|_| CommandError::InvalidDistance(raw.to_string()))?
            }
            None => 1,
        };
        return Ok(Subcommand::Scroll {
            direction,
            distance,
        });
    }

    if command == "cycle" {
        return Ok(Subcommand::Cycle);
    }

    if let Some(caps) = patterns.find.captures(command) {
        return Ok(Subcommand::Find(caps[1].to_lowercase()));
    }

    if command == "add" {
        return Ok(Subcommand::AddCurrent);
    }

    if let Some(caps) = patterns.add_list.captures(command) {
        let names = caps[1]
            .to_lowercase()
            .split(',')
            .map(|name| name.trim().to_string())
            .collect();
        return Ok(Subcommand::AddList(names));
    }

    if command == "reset" {
        return Ok(Subcommand::Reset);
    }

    if let Some(caps) = patterns.press.captures(command) {
        if let (Some(technique), Some(digit)) =
            (Technique::from_button_name(&caps[1]), caps[2].chars().next())
        {
            return Ok(Subcommand::Press { technique, digit });
        }
    }

    Err(CommandError::Unrecognized(command.to_string()))
}
