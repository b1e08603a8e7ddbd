//! Parsing of input lines into front-end commands
//!
//! What a bare line means depends on the stage: a phone number while
//! awaiting the phone, an OTP while awaiting the OTP. Once verified, lines
//! are `search` / `bulk` commands. A few keywords work at every stage.

use cl_core::Stage;
use thiserror::Error;

/// A command entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    RequestOtp(String),
    VerifyOtp(String),
    Search { number: String, country: String },
    BulkSearch { numbers: String, country: String },
    Status,
    Reset,
    Help,
    Quit,
}

/// Input that could not be turned into a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("Nothing to do yet. Enter a command, or 'help'.")]
    Blank,
}

/// Parse one input line for the given stage
pub fn parse_command(line: &str, stage: Stage) -> Result<Command, CommandError> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    match keyword.to_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(Command::Quit),
        "status" => return Ok(Command::Status),
        "reset" => return Ok(Command::Reset),
        "help" | "?" => return Ok(Command::Help),
        "phone" => return Ok(Command::RequestOtp(rest.join(" "))),
        "search" => {
            let (number, country) = split_country(&rest);
            return Ok(Command::Search { number, country });
        }
        "bulk" => {
            let (numbers, country) = split_country(&rest);
            return Ok(Command::BulkSearch { numbers, country });
        }
        _ => {}
    }

    // Empty input still reaches the flow, which reports the missing field
    match stage {
        Stage::AwaitingPhone => Ok(Command::RequestOtp(line.to_string())),
        Stage::AwaitingOtp => Ok(Command::VerifyOtp(line.to_string())),
        Stage::Verified if line.is_empty() => Err(CommandError::Blank),
        Stage::Verified => Err(CommandError::Unknown(keyword.to_string())),
    }
}

/// Last argument is the country code, everything before it the number(s)
fn split_country(args: &[&str]) -> (String, String) {
    match args {
        [] => (String::new(), String::new()),
        [only] => (only.to_string(), String::new()),
        [numbers @ .., country] => (numbers.join(" "), country.to_string()),
    }
}
