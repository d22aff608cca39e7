//! Journal error types

use std::path::PathBuf;

use thiserror::Error;

use crate::settings::EquipmentKind;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Unknown {kind}: {name}")]
    UnknownEquipment { kind: EquipmentKind, name: String },

    #[error("{kind} '{name}' already exists")]
    DuplicateEquipment { kind: EquipmentKind, name: String },

    #[error("A {kind} needs a name")]
    BlankEquipmentName { kind: EquipmentKind },

    /// Disabling this item would leave the list with nothing enabled
    #[error("'{name}' is the only enabled {kind}; enable another one first")]
    LastEnabledItem { kind: EquipmentKind, name: String },

    #[error("Invalid Aeropress type '{0}' (expected Normal or Inverted)")]
    InvalidAeropressType(String),

    #[error("Recipe not found: {0}")]
    RecipeNotFound(String),

    #[error("Failed to access settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}
