//! Enabled-equipment preferences
//!
//! The settings object is loaded through a [`SettingsStore`] and passed to
//! whatever needs it; there is no process-wide instance.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::JournalError;

const DEFAULT_METHODS: [&str; 7] = [
    "V60-01",
    "V60-02",
    "Kalita Wave 155",
    "Chemex",
    "Espresso (Gaggia Classic Pro)",
    "French Press",
    "Aeropress",
];

const DEFAULT_GRINDERS: [&str; 4] = [
    "Comandante C40",
    "1Zpresso J-Max",
    "Baratza Encore",
    "Niche Zero",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EquipmentKind {
    Method,
    Grinder,
}

impl fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipmentKind::Method => write!(f, "brewing method"),
            EquipmentKind::Grinder => write!(f, "grinder"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    pub enabled: bool,
}

impl EquipmentItem {
    fn enabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentSettings {
    #[serde(default)]
    pub brewing_methods: Vec<EquipmentItem>,
    #[serde(default)]
    pub grinders: Vec<EquipmentItem>,
}

impl Default for EquipmentSettings {
    fn default() -> Self {
        Self {
            brewing_methods: default_items(EquipmentKind::Method),
            grinders: default_items(EquipmentKind::Grinder),
        }
    }
}

fn default_items(kind: EquipmentKind) -> Vec<EquipmentItem> {
    let names: &[&str] = match kind {
        EquipmentKind::Method => &DEFAULT_METHODS,
        EquipmentKind::Grinder => &DEFAULT_GRINDERS,
    };
    names.iter().map(|n| EquipmentItem::enabled(n)).collect()
}

impl EquipmentSettings {
    pub fn items(&self, kind: EquipmentKind) -> &[EquipmentItem] {
        match kind {
            EquipmentKind::Method => &self.brewing_methods,
            EquipmentKind::Grinder => &self.grinders,
        }
    }

    fn items_mut(&mut self, kind: EquipmentKind) -> &mut Vec<EquipmentItem> {
        match kind {
            EquipmentKind::Method => &mut self.brewing_methods,
            EquipmentKind::Grinder => &mut self.grinders,
        }
    }

    /// Names of enabled items, in list order
    pub fn enabled(&self, kind: EquipmentKind) -> Vec<&str> {
        self.items(kind)
            .iter()
            .filter(|item| item.enabled)
            .map(|item| item.name.as_str())
            .collect()
    }

    /// Enabled item matching `name` case-insensitively, with its stored spelling
    pub fn find_enabled(&self, kind: EquipmentKind, name: &str) -> Option<&str> {
        self.enabled(kind)
            .into_iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(name.trim()))
    }

    /// Enable or disable an item. Each list must keep at least one enabled item.
    pub fn set_enabled(
        &mut self,
        kind: EquipmentKind,
        name: &str,
        enabled: bool,
    ) -> Result<(), JournalError> {
        let enabled_count = self.enabled(kind).len();
        let items = self.items_mut(kind);

        let item = items
            .iter_mut()
            .find(|item| item.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| JournalError::UnknownEquipment {
                kind,
                name: name.to_string(),
            })?;

        if !enabled && item.enabled && enabled_count <= 1 {
            return Err(JournalError::LastEnabledItem {
                kind,
                name: item.name.clone(),
            });
        }

        item.enabled = enabled;
        debug!("Set {} '{}' enabled={}", kind, item.name, enabled);
        Ok(())
    }

    /// Append a new enabled item
    pub fn add(&mut self, kind: EquipmentKind, name: &str) -> Result<(), JournalError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(JournalError::BlankEquipmentName { kind });
        }
        let items = self.items_mut(kind);
        if items.iter().any(|item| item.name.eq_ignore_ascii_case(name)) {
            return Err(JournalError::DuplicateEquipment {
                kind,
                name: name.to_string(),
            });
        }
        items.push(EquipmentItem::enabled(name));
        Ok(())
    }

    /// Repair lists loaded from disk so each has at least one enabled item
    pub fn normalize(&mut self) {
        for kind in [EquipmentKind::Method, EquipmentKind::Grinder] {
            let items = self.items_mut(kind);
            if items.is_empty() {
                warn!("No {} entries in settings, restoring defaults", kind);
                *items = default_items(kind);
            } else if !items.iter().any(|item| item.enabled) {
                warn!("No {} enabled, enabling '{}'", kind, items[0].name);
                items[0].enabled = true;
            }
        }
    }
}

/// Load/save collaborator for equipment settings
pub trait SettingsStore {
    fn load(&self) -> Result<EquipmentSettings, JournalError>;
    fn save(&self, settings: &EquipmentSettings) -> Result<(), JournalError>;
}

/// Settings persisted as a TOML file
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<EquipmentSettings, JournalError> {
        if !self.path.exists() {
            debug!("Settings file {} not found, using defaults", self.path.display());
            return Ok(EquipmentSettings::default());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| JournalError::SettingsIo {
            path: self.path.clone(),
            source,
        })?;
        let mut settings: EquipmentSettings =
            toml::from_str(&content).map_err(|source| JournalError::SettingsParse {
                path: self.path.clone(),
                source,
            })?;

        settings.normalize();
        Ok(settings)
    }

    fn save(&self, settings: &EquipmentSettings) -> Result<(), JournalError> {
        let content = toml::to_string_pretty(settings)?;
        fs::write(&self.path, content).map_err(|source| JournalError::SettingsIo {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
