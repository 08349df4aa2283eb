//! Command-line interface and REPL
//!
//! The same verbs drive one-shot subcommands and the interactive editor.

use crate::block_state::{encode, BlockState};
use crate::drivers::CommandSink;
use crate::macros::{Macro, MacroStore, SaveOutcome, UNBOUND_KEY};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rustyline::DefaultEditor;

/// Macro and block-state commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum MacroCommand {
    /// List all macros
    List,

    /// Show the actions of a macro
    Show { name: String },

    /// Add a macro that submits the given commands in order
    Add {
        name: String,

        /// Key code to bind (-1 for none)
        #[arg(short, long, default_value_t = UNBOUND_KEY, allow_negative_numbers = true)]
        key: i32,

        /// Store the macro disabled
        #[arg(long)]
        disabled: bool,

        /// Commands, one argument each (quote commands containing spaces)
        #[arg(required = true)]
        commands: Vec<String>,
    },

    /// Remove the first macro with this name
    Remove { name: String },

    /// Enable a macro
    Enable { name: String },

    /// Disable a macro
    Disable { name: String },

    /// Bind a macro to a key code
    Bind {
        name: String,
        #[arg(allow_negative_numbers = true)]
        key: i32,
    },

    /// Remove a macro's key binding
    Unbind { name: String },

    /// Run a macro against the console sink
    Run { name: String },

    /// Print the canonical string of a block state
    Encode {
        /// Block identifier, e.g. minecraft:lever
        id: String,

        /// Properties in declared order, as name=value
        properties: Vec<String>,
    },
}

/// One line typed into the REPL
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug)]
enum ReplCommand {
    #[command(flatten)]
    Macro(MacroCommand),

    /// Save the macro list to disk
    Save,

    /// Leave the editor
    #[command(alias = "quit")]
    Exit,
}

/// Execute one command against the store
pub fn execute(command: MacroCommand, store: &mut MacroStore, sink: &mut dyn CommandSink) -> Result<()> {
    match command {
        MacroCommand::List => {
            print_list(store.macros());
        }
        MacroCommand::Show { name } => {
            let m = lookup(store, &name)?;
            print_macro(m);
        }
        MacroCommand::Add {
            name,
            key,
            disabled,
            commands,
        } => {
            let mut m = Macro::from_commands(name, commands).with_key(key);
            m.enabled = !disabled;
            let name = m.name.clone();
            report_save(&store.add(m));
            println!("{} {}", "Added".green(), name.bold());
        }
        MacroCommand::Remove { name } => {
            let removal = store.remove_named(&name);
            report_save(&removal.save);
            match removal.removed {
                Some(m) => println!("{} {}", "Removed".green(), m.name.bold()),
                None => anyhow::bail!("No macro named '{}'", name),
            }
        }
        MacroCommand::Enable { name } => edit(store, &name, |m| m.enabled = true)?,
        MacroCommand::Disable { name } => edit(store, &name, |m| m.enabled = false)?,
        MacroCommand::Bind { name, key } => edit(store, &name, |m| m.key = key)?,
        MacroCommand::Unbind { name } => edit(store, &name, |m| m.key = UNBOUND_KEY)?,
        MacroCommand::Run { name } => {
            let m = lookup(store, &name)?;
            if !m.enabled {
                println!("{} '{}' is disabled, running anyway", "Note:".yellow(), m.name);
            }
            m.run(sink)?;
        }
        MacroCommand::Encode { id, properties } => {
            println!("{}", encode_arguments(&id, &properties)?);
        }
    }

    Ok(())
}

/// Canonical block-state string from an identifier and `name=value` pairs
pub fn encode_arguments(id: &str, properties: &[String]) -> Result<String> {
    let text = if properties.is_empty() {
        id.to_string()
    } else {
        format!("{}[{}]", id, properties.join(","))
    };

    let state: BlockState = text
        .parse()
        .with_context(|| format!("Invalid block state '{}'", text))?;
    Ok(encode(&state))
}

/// Interactive macro editor
pub fn run_repl(store: &mut MacroStore, sink: &mut dyn CommandSink) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!(
        "{} ({} macros, type 'help' for commands)",
        "Redstone Tools macro editor".bold().cyan(),
        store.macros().len()
    );

    loop {
        let readline = rl.readline("macros> ");
        let line = match readline {
            Ok(line) => line,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        let words = match split_words(&line) {
            Ok(words) => words,
            Err(e) => {
                println!("{} {}", "Error:".red(), e);
                continue;
            }
        };

        let parsed = match ReplLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Also covers --help output
                let _ = e.print();
                continue;
            }
        };

        match parsed.command {
            ReplCommand::Exit => break,
            ReplCommand::Save => report_save(&store.save()),
            ReplCommand::Macro(command) => {
                if let Err(e) = execute(command, store, sink) {
                    println!("{} {:#}", "Error:".red(), e);
                }
            }
        }
    }

    Ok(())
}

/// Split a REPL line into words, keeping double-quoted runs together
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        anyhow::bail!("Unterminated quote");
    }
    if in_word {
        words.push(current);
    }

    Ok(words)
}

fn lookup<'a>(store: &'a MacroStore, name: &str) -> Result<&'a Macro> {
    store
        .find(name)
        .with_context(|| format!("No macro named '{}'", name))
}

/// Apply an in-place edit, then save explicitly
fn edit(store: &mut MacroStore, name: &str, change: impl FnOnce(&mut Macro)) -> Result<()> {
    let m = store
        .find_mut(name)
        .with_context(|| format!("No macro named '{}'", name))?;
    change(m);
    let summary = describe(m);
    report_save(&store.save());
    println!("{} {}", "Updated".green(), summary);
    Ok(())
}

fn report_save(outcome: &SaveOutcome) {
    if let SaveOutcome::Dropped(reason) = outcome {
        println!("{} changes were not saved: {}", "Warning:".yellow(), reason);
    }
}

fn key_label(m: &Macro) -> String {
    if m.is_bound() {
        m.key.to_string()
    } else {
        "unbound".to_string()
    }
}

fn describe(m: &Macro) -> String {
    let state = if m.enabled {
        "enabled".green()
    } else {
        "disabled".red()
    };
    format!(
        "{} [{}] key={} ({} actions)",
        m.name.bold(),
        state,
        key_label(m),
        m.actions.len()
    )
}

fn print_list(macros: &[Macro]) {
    if macros.is_empty() {
        println!("{}", "No macros defined".dimmed());
        return;
    }
    for m in macros {
        println!("  {}", describe(m));
    }
}

fn print_macro(m: &Macro) {
    println!("{}", describe(m));
    for (index, action) in m.actions.iter().enumerate() {
        println!("  {}. {}", index + 1, action.to_string().yellow());
    }
}
