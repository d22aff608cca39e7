//! Data models for coffees, recipes and brewing notes

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::JournalError;

/// Number of pour slots on a recipe: bloom plus nine follow-up pours
pub const POUR_SLOTS: usize = 10;

/// Slot names as shown on the entry form
pub const POUR_LABELS: [&str; POUR_SLOTS] = [
    "Bloom", "2nd pour", "3rd pour", "4th pour", "5th pour", "6th pour", "7th pour", "8th pour",
    "9th pour", "10th pour",
];

/// Brewing method category derived from the free-form method name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    PourOver,
    Espresso,
    FrenchPress,
    Aeropress,
    Unknown,
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::PourOver => write!(f, "Pour-over"),
            MethodKind::Espresso => write!(f, "Espresso"),
            MethodKind::FrenchPress => write!(f, "French press"),
            MethodKind::Aeropress => write!(f, "Aeropress"),
            MethodKind::Unknown => write!(f, "Other"),
        }
    }
}

/// Import files go through `FromStr`, so they accept the same spellings as the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum AeropressType {
    Normal,
    Inverted,
}

impl AeropressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AeropressType::Normal => "Normal",
            AeropressType::Inverted => "Inverted",
        }
    }
}

impl fmt::Display for AeropressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AeropressType {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("normal") => Ok(AeropressType::Normal),
            s if s.eq_ignore_ascii_case("inverted") => Ok(AeropressType::Inverted),
            other => Err(JournalError::InvalidAeropressType(other.to_string())),
        }
    }
}

impl TryFrom<String> for AeropressType {
    type Error = JournalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Coffee {
    pub id: Uuid,
    pub name: String,
    pub roaster: Option<String>,
    pub origin: Option<String>,
    pub process: Option<String>,
    pub roast_level: Option<String>,
    pub roast_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Coffee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            roaster: None,
            origin: None,
            process: None,
            roast_level: None,
            roast_date: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match over the searchable fields.
    /// A blank query matches every coffee.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(&self.name),
            self.roaster.as_ref(),
            self.origin.as_ref(),
            self.process.as_ref(),
            self.notes.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub brewing_method: String,
    pub grinder: String,
    pub grind_size: i32,
    pub water_temp: i32, // °C
    pub dose: f64,       // grams
    pub brew_time: i32,  // seconds
    pub usage_count: i64,
    /// Cumulative grams after each pour; index 0 is the bloom
    pub pours: [Option<f64>; POUR_SLOTS],
    pub bloom_time: i32,
    pub water_out: f64, // espresso only
    pub aeropress_type: Option<AeropressType>,
    pub plunge_time: i32,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            brewing_method: "V60-01".to_string(),
            grinder: "Comandante C40".to_string(),
            grind_size: 20,
            water_temp: 94,
            dose: 15.0,
            brew_time: 180,
            usage_count: 0,
            pours: [None; POUR_SLOTS],
            bloom_time: 30,
            water_out: 0.0,
            aeropress_type: None,
            plunge_time: 0,
            created_at: Utc::now(),
        }
    }

    pub fn bloom(&self) -> Option<f64> {
        self.pours[0]
    }

    /// Pours that are actually present, in slot order
    pub fn set_pours(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.pours
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.filter(|v| *v > 0.0).map(|v| (i, v)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrewingNote {
    pub id: Uuid,
    pub coffee_id: Uuid,
    pub recipe_id: Option<Uuid>,
    /// 0 = unrated, otherwise 1-5 stars
    pub rating: i32,
    pub tasting_notes: Option<String>,
    pub adjustments: Option<String>,
    pub brewed_at: DateTime<Utc>,
}

impl BrewingNote {
    pub fn new(coffee_id: Uuid, recipe_id: Option<Uuid>, rating: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            coffee_id,
            recipe_id,
            rating,
            tasting_notes: None,
            adjustments: None,
            brewed_at: Utc::now(),
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [self.tasting_notes.as_ref(), self.adjustments.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Star rating rendered for lists, e.g. "★★★☆☆"
    pub fn stars(&self) -> String {
        let filled = self.rating.clamp(0, 5) as usize;
        format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
    }
}

/// Resolve an optional text field for display
pub fn or_unset(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => "-",
    }
}
