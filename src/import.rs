//! Recipe import from a directory of TOML files
//!
//! Each `*.toml` file under the directory describes one recipe:
//!
//! ```toml
//! name = "Hoffmann V60"
//! method = "V60-02"
//! dose = 15.0
//! pours = [45.0, 150.0, 250.0]
//! ```
//!
//! Fields left out fall back to the defaults of a new recipe.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::Deserialize;
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::db;
use crate::models::{AeropressType, Recipe, POUR_SLOTS};

/// Recipe as written in an import file
#[derive(Debug, Deserialize)]
struct RecipeFile {
    name: String,
    method: Option<String>,
    grinder: Option<String>,
    grind_size: Option<i32>,
    water_temp: Option<i32>,
    dose: Option<f64>,
    brew_time: Option<i32>,
    bloom_time: Option<i32>,
    #[serde(default)]
    pours: Vec<f64>, // bloom first
    water_out: Option<f64>,
    aeropress_type: Option<AeropressType>,
    plunge_time: Option<i32>,
}

impl RecipeFile {
    fn into_recipe(self) -> Result<Recipe> {
        if self.name.trim().is_empty() {
            bail!("recipe name is empty");
        }
        if self.pours.len() > POUR_SLOTS {
            bail!(
                "{} pours listed, at most {} are supported",
                self.pours.len(),
                POUR_SLOTS
            );
        }

        let mut recipe = Recipe::new(self.name.trim());
        if let Some(method) = self.method {
            recipe.brewing_method = method;
        }
        if let Some(grinder) = self.grinder {
            recipe.grinder = grinder;
        }
        recipe.grind_size = self.grind_size.unwrap_or(recipe.grind_size);
        recipe.water_temp = self.water_temp.unwrap_or(recipe.water_temp);
        recipe.dose = self.dose.unwrap_or(recipe.dose);
        recipe.brew_time = self.brew_time.unwrap_or(recipe.brew_time);
        recipe.bloom_time = self.bloom_time.unwrap_or(recipe.bloom_time);
        recipe.water_out = self.water_out.unwrap_or(recipe.water_out);
        recipe.aeropress_type = self.aeropress_type;
        recipe.plunge_time = self.plunge_time.unwrap_or(recipe.plunge_time);

        for (slot, amount) in self.pours.into_iter().enumerate() {
            recipe.pours[slot] = Some(amount).filter(|v| *v > 0.0);
        }

        Ok(recipe)
    }
}

/// Find all recipe files under a directory
pub fn find_recipe_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    files.sort();

    Ok(files)
}

fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file: RecipeFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    file.into_recipe()
        .with_context(|| format!("Invalid recipe in {}", path.display()))
}

/// Import every recipe file under `dir` into the database
pub fn import_directory(conn: &Connection, dir: &Path) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    let files = find_recipe_files(dir)?;
    info!("Found {} recipe files in {}", files.len(), dir.display());

    for path in &files {
        let recipe = match parse_recipe_file(path) {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("{:#}", e);
                stats.errors += 1;
                continue;
            }
        };

        if db::find_recipe_by_name(conn, &recipe.name)?.is_some() {
            debug!("Skipping '{}': a recipe with that name exists", recipe.name);
            stats.skipped += 1;
            continue;
        }

        if recipe.supports_pours() && !recipe.has_valid_pour_sequence() {
            warn!(
                "Recipe '{}' in {} has pours that do not strictly increase",
                recipe.name,
                path.display()
            );
            stats.invalid_pours += 1;
        }

        db::insert_recipe(conn, &recipe)?;
        info!("Imported {} ({})", recipe.name, recipe.display_method());
        stats.imported += 1;
    }

    Ok(stats)
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub imported: usize,
    pub skipped: usize,
    pub invalid_pours: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} recipes ({} with non-increasing pours). Skipped: {}, Errors: {}",
            self.imported, self.invalid_pours, self.skipped, self.errors
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::RecipeOrder;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_import_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("immersion")).unwrap();

        write(
            dir.path(),
            "v60.toml",
            r#"
            name = "Hoffmann V60"
            method = "V60-02"
            dose = 15.0
            pours = [45.0, 150.0, 250.0]
            "#,
        );
        write(
            &dir.path().join("immersion"),
            "aeropress.toml",
            r#"
            name = "Inverted Aeropress"
            method = "Aeropress"
            aeropress_type = "Inverted"
            plunge_time = 120
            "#,
        );
        write(
            dir.path(),
            "bad-pours.toml",
            r#"
            name = "Flat pours"
            method = "Chemex"
            pours = [60.0, 60.0]
            "#,
        );
        write(dir.path(), "broken.toml", "name = ");
        write(dir.path(), "readme.txt", "not a recipe");

        let conn = open();
        let stats = import_directory(&conn, dir.path()).unwrap();
        assert_eq!(stats.imported, 3);
        assert_eq!(stats.invalid_pours, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.skipped, 0);

        let v60 = db::find_recipe_by_name(&conn, "Hoffmann V60").unwrap().unwrap();
        assert_eq!(v60.pour_count(), 3);
        assert_eq!(v60.final_weight(), 250.0);
        assert_eq!(v60.grinder, "Comandante C40");

        let ap = db::find_recipe_by_name(&conn, "Inverted Aeropress").unwrap().unwrap();
        assert_eq!(ap.display_method(), "Aeropress (Inverted)");

        // Second run skips everything already present
        let again = import_directory(&conn, dir.path()).unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(again.skipped, 3);
        assert_eq!(db::list_recipes(&conn, RecipeOrder::ByName).unwrap().len(), 3);
    }

    #[test]
    fn test_aeropress_type_any_case() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "lower.toml",
            r#"
            name = "Lowercase Aeropress"
            method = "Aeropress"
            aeropress_type = "inverted"
            "#,
        );
        write(
            dir.path(),
            "padded.toml",
            r#"
            name = "Padded Aeropress"
            method = "Aeropress"
            aeropress_type = " NORMAL "
            "#,
        );
        write(
            dir.path(),
            "sideways.toml",
            r#"
            name = "Sideways Aeropress"
            method = "Aeropress"
            aeropress_type = "sideways"
            "#,
        );

        let conn = open();
        let stats = import_directory(&conn, dir.path()).unwrap();
        assert_eq!(stats.imported, 2);
        assert_eq!(stats.errors, 1);

        let lower = db::find_recipe_by_name(&conn, "Lowercase Aeropress").unwrap().unwrap();
        assert_eq!(lower.aeropress_type, Some(AeropressType::Inverted));
        let padded = db::find_recipe_by_name(&conn, "Padded Aeropress").unwrap().unwrap();
        assert_eq!(padded.aeropress_type, Some(AeropressType::Normal));
    }

    #[test]
    fn test_too_many_pours_rejected() {
        let file = RecipeFile {
            name: "Eleven".to_string(),
            method: None,
            grinder: None,
            grind_size: None,
            water_temp: None,
            dose: None,
            brew_time: None,
            bloom_time: None,
            pours: (1..=11).map(|i| i as f64 * 20.0).collect(),
            water_out: None,
            aeropress_type: None,
            plunge_time: None,
        };
        assert!(file.into_recipe().is_err());
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        assert!(import_directory(&open(), &dir.path().join("nope")).is_err());
    }
}
