//! Console sink - logs every submitted command

use crate::drivers::CommandSink;
use anyhow::Result;
use tracing::{debug, info};

/// ConsoleSink prints macro commands instead of sending them to a game
///
/// Useful for:
/// - Dry-running macros from the command line
/// - Checking action order after editing a macro file
pub struct ConsoleSink {
    name: String,
    /// Submission counter for debugging
    execution_count: u64,
}

impl ConsoleSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            execution_count: 0,
        }
    }

    pub fn execution_count(&self) -> u64 {
        self.execution_count
    }
}

impl CommandSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn submit(&mut self, command: &str) -> Result<()> {
        self.execution_count += 1;

        info!(
            "🎮 [{}] Sink '{}' → {} [exec #{}]",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.name,
            command,
            self.execution_count
        );

        debug!(
            sink = self.name,
            command = command,
            exec_count = self.execution_count,
            "ConsoleSink submission"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macros::default_macros;

    #[test]
    fn test_console_sink_counts_submissions() {
        let mut sink = ConsoleSink::new("test");
        assert_eq!(sink.name(), "test");
        assert_eq!(sink.execution_count(), 0);

        sink.submit("/say one").unwrap();
        sink.submit("/say two").unwrap();

        assert_eq!(sink.execution_count(), 2);
    }

    #[test]
    fn test_console_sink_runs_default_macro() {
        let mut sink = ConsoleSink::new("dry-run");

        for m in default_macros() {
            m.run(&mut sink).unwrap();
        }

        assert_eq!(sink.execution_count(), 3);
    }
}
