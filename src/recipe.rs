//! Recipe brewing-method classification and derived metrics
//!
//! Everything here is computed from the current field values on each call;
//! nothing derived is stored on the recipe.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AeropressType, BrewingNote, MethodKind, Recipe};

/// Yield estimate used when a recipe has no recorded pours (1:15 ratio)
pub const FALLBACK_BREW_RATIO: f64 = 15.0;

// Checked in order; the first match wins.
static METHOD_PATTERNS: LazyLock<[(MethodKind, Regex); 4]> = LazyLock::new(|| {
    [
        (MethodKind::PourOver, method_regex(r"v60|kalita|chemex")),
        (MethodKind::Espresso, method_regex(r"espresso")),
        (MethodKind::FrenchPress, method_regex(r"french press")),
        (MethodKind::Aeropress, method_regex(r"aeropress")),
    ]
});

fn method_regex(pattern: &str) -> Regex {
    // Patterns are literals above, so this only fails on a programming error.
    Regex::new(&format!("(?i){}", pattern)).expect("static method pattern")
}

/// Classify a free-form brewing method name
pub fn classify_method(method: &str) -> MethodKind {
    METHOD_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(method))
        .map(|(kind, _)| *kind)
        .unwrap_or(MethodKind::Unknown)
}

/// Check that set pours strictly increase, starting from the bloom amount.
///
/// Zero or negative entries are treated as absent and skipped; they are not
/// compared against. An empty list is valid.
pub fn is_valid_pour_sequence(bloom: f64, pours: &[f64]) -> bool {
    let mut previous = bloom;
    for &pour in pours.iter().filter(|p| **p > 0.0) {
        if pour <= previous {
            return false;
        }
        previous = pour;
    }
    true
}

/// Mean star rating over notes that carry a rating
pub fn average_rating(notes: &[BrewingNote]) -> Option<f64> {
    let rated: Vec<i32> = notes.iter().map(|n| n.rating).filter(|r| *r != 0).collect();
    if rated.is_empty() {
        return None;
    }
    Some(rated.iter().map(|r| f64::from(*r)).sum::<f64>() / rated.len() as f64)
}

impl Recipe {
    pub fn method_kind(&self) -> MethodKind {
        classify_method(&self.brewing_method)
    }

    pub fn is_pour_over(&self) -> bool {
        self.method_kind() == MethodKind::PourOver
    }

    pub fn is_espresso(&self) -> bool {
        self.method_kind() == MethodKind::Espresso
    }

    pub fn is_french_press(&self) -> bool {
        self.method_kind() == MethodKind::FrenchPress
    }

    pub fn is_aeropress(&self) -> bool {
        self.method_kind() == MethodKind::Aeropress
    }

    pub fn supports_pours(&self) -> bool {
        matches!(
            self.method_kind(),
            MethodKind::PourOver | MethodKind::FrenchPress | MethodKind::Aeropress
        )
    }

    pub fn supports_bloom(&self) -> bool {
        self.supports_pours()
    }

    /// Number of recorded pours; only pour-over recipes count them
    pub fn pour_count(&self) -> usize {
        if !self.is_pour_over() {
            return 0;
        }
        self.set_pours().count()
    }

    /// Expected beverage weight in grams
    pub fn final_weight(&self) -> f64 {
        if self.is_espresso() {
            return self.water_out;
        }

        if self.supports_pours() {
            // Pours should ascend, but take the max rather than trust the last slot.
            let highest = self.set_pours().map(|(_, v)| v).reduce(f64::max);
            if let Some(highest) = highest {
                return highest;
            }
        }

        self.dose * FALLBACK_BREW_RATIO
    }

    /// Validate the recipe's own pours, using the bloom slot as baseline
    pub fn has_valid_pour_sequence(&self) -> bool {
        let bloom = self.bloom().filter(|b| *b > 0.0).unwrap_or(0.0);
        let rest: Vec<f64> = self.pours[1..].iter().map(|p| p.unwrap_or(0.0)).collect();
        is_valid_pour_sequence(bloom, &rest)
    }

    pub fn increment_usage_count(&mut self) {
        self.usage_count = self.usage_count.saturating_add(1);
    }

    /// Method name annotated with Aeropress orientation or pour count
    pub fn display_method(&self) -> String {
        if self.is_aeropress() && self.aeropress_type == Some(AeropressType::Inverted) {
            return format!("{} (Inverted)", self.brewing_method);
        }

        match self.pour_count() {
            0 => self.brewing_method.clone(),
            1 => format!("{} - 1 pour", self.brewing_method),
            n => format!("{} - {} pours", self.brewing_method, n),
        }
    }

    /// Multi-line description used by the `recipe` command
    pub fn describe(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Recipe: {}\n", self.name));
        output.push_str(&format!(
            "  Method: {} ({})\n",
            self.display_method(),
            self.method_kind()
        ));
        output.push_str(&format!(
            "  Grinder: {} @ {}\n",
            self.grinder, self.grind_size
        ));
        let time_label = if self.is_french_press() {
            "steep time"
        } else {
            "brew time"
        };
        output.push_str(&format!(
            "  Dose: {:.1}g, water {}°C, {} {}s\n",
            self.dose, self.water_temp, time_label, self.brew_time
        ));

        if self.is_espresso() {
            output.push_str(&format!("  Water out: {:.1}g\n", self.water_out));
        }
        if self.is_aeropress() {
            let kind = self.aeropress_type.unwrap_or(AeropressType::Normal);
            output.push_str(&format!(
                "  Aeropress: {}, plunge at {}s\n",
                kind, self.plunge_time
            ));
        }
        if self.supports_bloom() {
            output.push_str(&format!("  Bloom time: {}s\n", self.bloom_time));
        }
        if self.supports_pours() {
            for (slot, amount) in self.set_pours() {
                output.push_str(&format!(
                    "    {:<10} {:>6.1}g\n",
                    crate::models::POUR_LABELS[slot],
                    amount
                ));
            }
            if !self.has_valid_pour_sequence() {
                output.push_str("  Warning: pours do not strictly increase\n");
            }
        }

        output.push_str(&format!("  Final weight: {:.1}g\n", self.final_weight()));
        output.push_str(&format!("  Brewed {} times\n", self.usage_count));
        output
    }
}
