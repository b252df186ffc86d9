use thiserror::Error;

use crate::market::MarketRecord;

/// Everything the main loop reacts to. Spawned tasks report back through
/// these instead of touching shared state.
#[derive(Debug)]
pub enum Event {
    /// A line of user input, already parsed.
    Command(Command),

    /// marketCount read completed.
    Count { value: u64 },

    /// marketCount read failed.
    CountFailed { message: String },

    /// A per-index fetch batch completed. `generation` identifies which
    /// refresh this batch belongs to; stale batches are discarded.
    Batch {
        generation: u64,
        outcome: Result<Vec<MarketRecord>, String>,
    },

    /// createMarket transaction finished (confirmed or failed).
    Submitted { outcome: Result<String, String> },

    /// EOF on stdin or Ctrl+C.
    Shutdown,
}

/// User commands, the terminal analogue of the page's buttons and form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect,
    Disconnect,
    Refresh,
    Create { days: String, question: String },
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("usage: create <days> <question>")]
    CreateUsage,

    #[error("unrecognized command; type `help` for the list")]
    Unknown,
}

impl Command {
    /// Parse one input line. A known command with bad arguments gets its
    /// own usage error rather than the unknown-command one.
    pub fn parse(line: &str) -> Result<Command, ParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        match word {
            "connect" => Ok(Command::Connect),
            "disconnect" => Ok(Command::Disconnect),
            "refresh" | "list" => Ok(Command::Refresh),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            "create" => {
                let (days, question) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(ParseError::CreateUsage)?;
                Ok(Command::Create {
                    days: days.to_string(),
                    question: question.trim().to_string(),
                })
            }
            _ => Err(ParseError::Unknown),
        }
    }
}
