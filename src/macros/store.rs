//! Macro store - owns the macro list and keeps it in sync with disk
//!
//! Load policy: a missing, unreadable or corrupt file never blocks startup;
//! the store falls back to the default macro set and reports which path was
//! taken through [`LoadOutcome`]. A file that parses as a JSON array but
//! holds a macro that cannot be decoded (e.g. an unknown action type) is
//! fatal and surfaces as [`MacroError::Decode`].
//!
//! Save policy: failures are swallowed and reported as
//! [`SaveOutcome::Dropped`] so interactive editing does not spam the console.

use super::codec;
use super::types::{default_macros, Macro};
use anyhow::Context;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal load errors
#[derive(Debug, Error)]
pub enum MacroError {
    #[error("macro #{index} in {} could not be decoded: {source}", .path.display())]
    Decode {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Why the default macro set was used instead of the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultReason {
    /// No file at the configured path
    Missing,
    /// Directory could not be created or file could not be read
    Unreadable(String),
    /// File was read but is not a JSON array
    Corrupt {
        error: String,
        /// Copy of the corrupt file, if one was written
        backup: Option<PathBuf>,
    },
}

/// How the store's initial contents were obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Defaulted(DefaultReason),
}

impl LoadOutcome {
    pub fn is_defaulted(&self) -> bool {
        matches!(self, LoadOutcome::Defaulted(_))
    }
}

/// Result of writing the list to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// Write failed and was skipped; holds the error text
    Dropped(String),
}

impl SaveOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, SaveOutcome::Written)
    }
}

/// Result of [`MacroStore::remove`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub removed: Option<Macro>,
    pub save: SaveOutcome,
}

/// Store behavior toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Copy a corrupt file aside before the defaults replace it
    pub backup_corrupt: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            backup_corrupt: true,
        }
    }
}

/// In-memory macro list backed by a JSON file
#[derive(Debug)]
pub struct MacroStore {
    path: PathBuf,
    macros: Vec<Macro>,
    load_outcome: LoadOutcome,
}

impl MacroStore {
    /// Open the store at `path` with default options
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MacroError> {
        Self::open_with(path, StoreOptions::default())
    }

    /// Open the store at `path`, loading its contents once
    pub fn open_with(path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self, MacroError> {
        let path = path.into();
        let (macros, load_outcome) = load(&path, options)?;

        debug!(
            "Macro store opened at {} ({} macros, {:?})",
            path.display(),
            macros.len(),
            load_outcome
        );

        Ok(Self {
            path,
            macros,
            load_outcome,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    /// Live, mutable macro list. Changes made through it are not persisted
    /// until [`MacroStore::save`] is called.
    pub fn list(&mut self) -> &mut Vec<Macro> {
        &mut self.macros
    }

    pub fn macros(&self) -> &[Macro] {
        &self.macros
    }

    /// First macro named exactly `name`
    pub fn find(&self, name: &str) -> Option<&Macro> {
        self.macros.iter().find(|m| m.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Macro> {
        self.macros.iter_mut().find(|m| m.name == name)
    }

    /// Enabled macros bound to `key`, in list order
    pub fn triggered_by(&self, key: i32) -> impl Iterator<Item = &Macro> + '_ {
        self.macros
            .iter()
            .filter(move |m| m.enabled && m.is_bound() && m.key == key)
    }

    /// Append a macro and persist
    pub fn add(&mut self, m: Macro) -> SaveOutcome {
        info!("Adding macro '{}'", m.name);
        self.macros.push(m);
        self.save()
    }

    /// Remove the first macro equal to `target` and persist
    pub fn remove(&mut self, target: &Macro) -> Removal {
        let position = self.macros.iter().position(|m| m == target);
        self.remove_at(position)
    }

    /// Remove the first macro named `name` and persist
    pub fn remove_named(&mut self, name: &str) -> Removal {
        let position = self.macros.iter().position(|m| m.name == name);
        self.remove_at(position)
    }

    fn remove_at(&mut self, position: Option<usize>) -> Removal {
        let removed = position.map(|index| self.macros.remove(index));
        if let Some(m) = &removed {
            info!("Removed macro '{}'", m.name);
        }

        Removal {
            removed,
            save: self.save(),
        }
    }

    /// Overwrite the file with the current list
    pub fn save(&self) -> SaveOutcome {
        match self.write_file() {
            Ok(()) => {
                debug!(
                    "Saved {} macros to {}",
                    self.macros.len(),
                    self.path.display()
                );
                SaveOutcome::Written
            }
            Err(e) => {
                debug!("Macro save skipped: {:#}", e);
                SaveOutcome::Dropped(format!("{:#}", e))
            }
        }
    }

    fn write_file(&self) -> anyhow::Result<()> {
        ensure_parent_dir(&self.path).with_context(|| {
            format!(
                "Failed to create macro directory for {}",
                self.path.display()
            )
        })?;

        let json = codec::encode_macros(&self.macros).context("Failed to serialize macros")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn defaulted(reason: DefaultReason) -> (Vec<Macro>, LoadOutcome) {
    (default_macros(), LoadOutcome::Defaulted(reason))
}

fn load(path: &Path, options: StoreOptions) -> Result<(Vec<Macro>, LoadOutcome), MacroError> {
    if let Err(e) = ensure_parent_dir(path) {
        warn!(
            "Cannot create macro directory for {}: {} (using default macros)",
            path.display(),
            e
        );
        return Ok(defaulted(DefaultReason::Unreadable(e.to_string())));
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(
                "No macro file at {}, using default macros",
                path.display()
            );
            return Ok(defaulted(DefaultReason::Missing));
        }
        Err(e) => {
            warn!(
                "Cannot read macro file {}: {} (using default macros)",
                path.display(),
                e
            );
            return Ok(defaulted(DefaultReason::Unreadable(e.to_string())));
        }
    };

    let elements = match codec::parse_document(&text) {
        Ok(elements) => elements,
        Err(e) => {
            warn!(
                "Macro file {} is not a valid JSON array: {} (using default macros)",
                path.display(),
                e
            );
            let backup = if options.backup_corrupt {
                backup_corrupt_file(path)
            } else {
                None
            };
            return Ok(defaulted(DefaultReason::Corrupt {
                error: e.to_string(),
                backup,
            }));
        }
    };

    let macros = elements
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            codec::decode_macro(value).map_err(|source| MacroError::Decode {
                path: path.to_path_buf(),
                index,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("Loaded {} macros from {}", macros.len(), path.display());
    let count = macros.len();
    Ok((macros, LoadOutcome::Loaded { count }))
}

/// Copy `path` to `<name>.corrupt-<timestamp>` next to it
fn backup_corrupt_file(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_string_lossy();
    let backup = path.with_file_name(format!(
        "{}.corrupt-{}",
        file_name,
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    match fs::copy(path, &backup) {
        Ok(_) => {
            warn!("Corrupt macro file backed up to {}", backup.display());
            Some(backup)
        }
        Err(e) => {
            warn!("Failed to back up corrupt macro file: {}", e);
            None
        }
    }
}
