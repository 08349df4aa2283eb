//! Command sinks - where macro actions are delivered
//!
//! The game side implements [`CommandSink`] to submit chat lines and slash
//! commands on the player's behalf. [`ConsoleSink`] logs them instead, for
//! the command-line tool and for testing macros without a running game.

mod console;

pub use console::ConsoleSink;

use anyhow::Result;

/// Receiver of the commands a macro submits
pub trait CommandSink {
    /// Sink name used in logs (e.g. "console", "chat")
    fn name(&self) -> &str;

    /// Submit one chat line or slash command
    fn submit(&mut self, command: &str) -> Result<()>;
}

/// Sink that records every submitted command, optionally refusing one
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<String>,
    fail_on: Option<String>,
}

impl RecordingSink {
    /// Sink that rejects `command` and accepts everything else
    pub fn failing_on(command: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            fail_on: Some(command.into()),
        }
    }
}

impl CommandSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    fn submit(&mut self, command: &str) -> Result<()> {
        if self.fail_on.as_deref() == Some(command) {
            anyhow::bail!("Command rejected: {}", command);
        }
        self.commands.push(command.to_string());
        Ok(())
    }
}
