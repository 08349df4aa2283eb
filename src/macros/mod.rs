//! User-defined macros and their persistence
//!
//! A macro is a named sequence of actions bound to a key. The [`MacroStore`]
//! owns the list and mirrors it to a JSON file, seeding a default macro the
//! first time it runs.

pub mod codec;
mod store;
mod types;


pub use store::{DefaultReason, LoadOutcome, MacroError, MacroStore, Removal, SaveOutcome, StoreOptions};
pub use types::{default_macros, Action, CommandAction, Macro, UNBOUND_KEY};
