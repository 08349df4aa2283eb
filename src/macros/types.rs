//! Macro type definitions
//!
//! A macro is a named, key-triggerable sequence of actions. The serde
//! derives here define the on-disk JSON schema.

use crate::drivers::CommandSink;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Key code meaning "no key bound"
pub const UNBOUND_KEY: i32 = -1;

/// Submit a chat line or slash command on the player's behalf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAction {
    /// Older builds read this field back as `data`
    #[serde(alias = "data")]
    pub command: String,
}

/// One step of a macro, discriminated by its `type` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    Command(CommandAction),
}

impl Action {
    /// Shorthand for a command action
    pub fn command(command: impl Into<String>) -> Self {
        Action::Command(CommandAction {
            command: command.into(),
        })
    }

    /// Value of the `type` discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Command(_) => "command",
        }
    }

    /// Perform this action against a command sink
    pub fn execute(&self, sink: &mut dyn CommandSink) -> Result<()> {
        match self {
            Action::Command(action) => sink.submit(&action.command),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Command(action) => write!(f, "command: {}", action.command),
        }
    }
}

/// A user-defined macro
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macro {
    pub name: String,
    /// Disabled macros are kept but never triggered
    pub enabled: bool,
    /// Bound key code, or [`UNBOUND_KEY`]
    pub key: i32,
    pub actions: Vec<Action>,
}

impl Macro {
    /// Enabled, unbound macro with no actions
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            key: UNBOUND_KEY,
            actions: Vec::new(),
        }
    }

    /// Enabled, unbound macro running `commands` in order
    pub fn from_commands<I, S>(name: impl Into<String>, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actions: commands.into_iter().map(Action::command).collect(),
            ..Self::new(name)
        }
    }

    pub fn with_key(mut self, key: i32) -> Self {
        self.key = key;
        self
    }

    pub fn is_bound(&self) -> bool {
        self.key != UNBOUND_KEY
    }

    /// Execute every action in order, stopping at the first failure
    pub fn run(&self, sink: &mut dyn CommandSink) -> Result<()> {
        for (index, action) in self.actions.iter().enumerate() {
            action.execute(sink).with_context(|| {
                format!(
                    "Macro '{}' failed at action {} ({})",
                    self.name, index, action
                )
            })?;
        }
        Ok(())
    }
}

/// Macro set seeded on first run
pub fn default_macros() -> Vec<Macro> {
    vec![Macro::from_commands(
        "test",
        ["/say hello", "/say world", "/say macros!"],
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::RecordingSink;

    #[test]
    fn test_default_macros() {
        let defaults = default_macros();
        assert_eq!(defaults.len(), 1);

        let test = &defaults[0];
        assert_eq!(test.name, "test");
        assert!(test.enabled);
        assert_eq!(test.key, UNBOUND_KEY);
        assert!(!test.is_bound());
        assert_eq!(
            test.actions,
            vec![
                Action::command("/say hello"),
                Action::command("/say world"),
                Action::command("/say macros!"),
            ]
        );
    }

    #[test]
    fn test_run_submits_in_order() {
        let m = Macro::from_commands("build", ["/fill ~ ~ ~ ~5 ~ ~5 stone", "/say done"]);
        let mut sink = RecordingSink::default();

        m.run(&mut sink).unwrap();

        assert_eq!(
            sink.commands,
            vec!["/fill ~ ~ ~ ~5 ~ ~5 stone".to_string(), "/say done".to_string()]
        );
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let m = Macro::from_commands("flaky", ["/a", "/b", "/c"]);
        let mut sink = RecordingSink::failing_on("/b");

        let err = m.run(&mut sink).unwrap_err();

        assert_eq!(sink.commands, vec!["/a".to_string()]);
        assert!(format!("{:#}", err).contains("action 1"));
    }

    #[test]
    fn test_action_kind_matches_tag() {
        let json = serde_json::to_value(Action::command("/time set day")).unwrap();
        assert_eq!(json["type"], Action::command("x").kind());
    }
}
