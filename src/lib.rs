//! Redstone Tools core
//!
//! Block-state argument encoding and persistent, key-bound command macros.

pub mod block_state;
pub mod cli;
pub mod config;
pub mod drivers;
pub mod macros;
pub mod paths;

pub use block_state::{encode, BlockState, BlockStateParseError, BlockStateView, Identifier};
pub use config::AppConfig;
pub use drivers::{CommandSink, ConsoleSink};
pub use macros::{Action, LoadOutcome, Macro, MacroError, MacroStore, SaveOutcome};
pub use paths::AppPaths;
