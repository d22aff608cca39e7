//! Database schema and operations

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::JournalError;
use crate::models::{AeropressType, BrewingNote, Coffee, Recipe, POUR_SLOTS};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        CREATE TABLE IF NOT EXISTS coffees (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            roaster TEXT,
            origin TEXT,
            process TEXT,
            roast_level TEXT,
            roast_date TEXT,
            notes TEXT,
            created_at TEXT NOT NULL
        );

        -- Pour columns hold cumulative grams; pour_1 is the bloom
        CREATE TABLE IF NOT EXISTS recipes (
            id BLOB PRIMARY KEY,
            name TEXT NOT NULL,
            brewing_method TEXT NOT NULL,
            grinder TEXT NOT NULL,
            grind_size INTEGER NOT NULL,
            water_temp INTEGER NOT NULL,
            dose REAL NOT NULL,
            brew_time INTEGER NOT NULL,
            usage_count INTEGER NOT NULL DEFAULT 0,
            bloom_time INTEGER NOT NULL DEFAULT 0,
            water_out REAL NOT NULL DEFAULT 0,
            aeropress_type TEXT,
            plunge_time INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            pour_1 REAL, pour_2 REAL, pour_3 REAL, pour_4 REAL, pour_5 REAL,
            pour_6 REAL, pour_7 REAL, pour_8 REAL, pour_9 REAL, pour_10 REAL
        );

        CREATE TABLE IF NOT EXISTS brewing_notes (
            id BLOB PRIMARY KEY,
            coffee_id BLOB NOT NULL REFERENCES coffees(id) ON DELETE CASCADE,
            recipe_id BLOB REFERENCES recipes(id) ON DELETE SET NULL,
            rating INTEGER NOT NULL DEFAULT 0,
            tasting_notes TEXT,
            adjustments TEXT,
            brewed_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notes_coffee ON brewing_notes(coffee_id);
        CREATE INDEX IF NOT EXISTS idx_notes_recipe ON brewing_notes(recipe_id);
        CREATE INDEX IF NOT EXISTS idx_recipes_usage ON recipes(usage_count);
        "#,
    )?;
    Ok(())
}

/// Clear all journal data
pub fn clear_all(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM brewing_notes;
        DELETE FROM recipes;
        DELETE FROM coffees;
        "#,
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Coffees
// ---------------------------------------------------------------------------

const COFFEE_COLUMNS: &str =
    "id, name, roaster, origin, process, roast_level, roast_date, notes, created_at";

fn coffee_from_row(row: &Row) -> rusqlite::Result<Coffee> {
    Ok(Coffee {
        id: row.get(0)?,
        name: row.get(1)?,
        roaster: row.get(2)?,
        origin: row.get(3)?,
        process: row.get(4)?,
        roast_level: row.get(5)?,
        roast_date: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub fn insert_coffee(conn: &Connection, coffee: &Coffee) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO coffees ({COFFEE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"),
        params![
            coffee.id,
            coffee.name,
            coffee.roaster,
            coffee.origin,
            coffee.process,
            coffee.roast_level,
            coffee.roast_date,
            coffee.notes,
            coffee.created_at,
        ],
    )
    .with_context(|| format!("Failed to insert coffee '{}'", coffee.name))?;
    debug!("Inserted coffee {} ({})", coffee.name, coffee.id);
    Ok(())
}

pub fn update_coffee(conn: &Connection, coffee: &Coffee) -> Result<()> {
    conn.execute(
        "UPDATE coffees SET name = ?2, roaster = ?3, origin = ?4, process = ?5,
             roast_level = ?6, roast_date = ?7, notes = ?8
         WHERE id = ?1",
        params![
            coffee.id,
            coffee.name,
            coffee.roaster,
            coffee.origin,
            coffee.process,
            coffee.roast_level,
            coffee.roast_date,
            coffee.notes,
        ],
    )?;
    Ok(())
}

pub fn get_coffee(conn: &Connection, id: Uuid) -> Result<Option<Coffee>> {
    let coffee = conn
        .query_row(
            &format!("SELECT {COFFEE_COLUMNS} FROM coffees WHERE id = ?1"),
            [id],
            coffee_from_row,
        )
        .optional()?;
    Ok(coffee)
}

/// Delete a coffee and all of its brewing notes
pub fn delete_coffee(conn: &Connection, id: Uuid) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM coffees WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

/// List all coffees, sorted by name
pub fn list_coffees(conn: &Connection) -> Result<Vec<Coffee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COFFEE_COLUMNS} FROM coffees ORDER BY name COLLATE NOCASE"
    ))?;

    let rows = stmt.query_map([], coffee_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn search_coffees(conn: &Connection, query: &str) -> Result<Vec<Coffee>> {
    let mut coffees = list_coffees(conn)?;
    coffees.retain(|c| c.matches(query));
    Ok(coffees)
}

pub fn find_coffee_by_name(conn: &Connection, name: &str) -> Result<Option<Coffee>> {
    let coffee = conn
        .query_row(
            &format!(
                "SELECT {COFFEE_COLUMNS} FROM coffees WHERE name = ?1 COLLATE NOCASE LIMIT 1"
            ),
            [name.trim()],
            coffee_from_row,
        )
        .optional()?;
    Ok(coffee)
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

const RECIPE_COLUMNS: &str = "id, name, brewing_method, grinder, grind_size, water_temp, dose, \
     brew_time, usage_count, bloom_time, water_out, aeropress_type, plunge_time, created_at, \
     pour_1, pour_2, pour_3, pour_4, pour_5, pour_6, pour_7, pour_8, pour_9, pour_10";

const FIRST_POUR_COLUMN: usize = 14;

/// Sort order for recipe listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOrder {
    ByName,
    /// Most used first
    ByUsage,
}

fn recipe_from_row(row: &Row) -> rusqlite::Result<Recipe> {
    let aeropress_type = row
        .get::<_, Option<String>>(11)?
        .map(|s| s.parse::<AeropressType>())
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;

    let mut pours = [None; POUR_SLOTS];
    for (slot, pour) in pours.iter_mut().enumerate() {
        *pour = row.get(FIRST_POUR_COLUMN + slot)?;
    }

    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        brewing_method: row.get(2)?,
        grinder: row.get(3)?,
        grind_size: row.get(4)?,
        water_temp: row.get(5)?,
        dose: row.get(6)?,
        brew_time: row.get(7)?,
        usage_count: row.get(8)?,
        bloom_time: row.get(9)?,
        water_out: row.get(10)?,
        aeropress_type,
        plunge_time: row.get(12)?,
        created_at: row.get(13)?,
        pours,
    })
}

pub fn insert_recipe(conn: &Connection, recipe: &Recipe) -> Result<()> {
    let p = &recipe.pours;
    conn.execute(
        &format!(
            "INSERT INTO recipes ({RECIPE_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                     ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24)"
        ),
        params![
            recipe.id,
            recipe.name,
            recipe.brewing_method,
            recipe.grinder,
            recipe.grind_size,
            recipe.water_temp,
            recipe.dose,
            recipe.brew_time,
            recipe.usage_count,
            recipe.bloom_time,
            recipe.water_out,
            recipe.aeropress_type.map(|t| t.as_str()),
            recipe.plunge_time,
            recipe.created_at,
            p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7], p[8], p[9],
        ],
    )
    .with_context(|| format!("Failed to insert recipe '{}'", recipe.name))?;
    debug!("Inserted recipe {} ({})", recipe.name, recipe.id);
    Ok(())
}

pub fn update_recipe(conn: &Connection, recipe: &Recipe) -> Result<()> {
    let p = &recipe.pours;
    conn.execute(
        "UPDATE recipes SET name = ?2, brewing_method = ?3, grinder = ?4, grind_size = ?5,
             water_temp = ?6, dose = ?7, brew_time = ?8, usage_count = ?9, bloom_time = ?10,
             water_out = ?11, aeropress_type = ?12, plunge_time = ?13,
             pour_1 = ?14, pour_2 = ?15, pour_3 = ?16, pour_4 = ?17, pour_5 = ?18,
             pour_6 = ?19, pour_7 = ?20, pour_8 = ?21, pour_9 = ?22, pour_10 = ?23
         WHERE id = ?1",
        params![
            recipe.id,
            recipe.name,
            recipe.brewing_method,
            recipe.grinder,
            recipe.grind_size,
            recipe.water_temp,
            recipe.dose,
            recipe.brew_time,
            recipe.usage_count,
            recipe.bloom_time,
            recipe.water_out,
            recipe.aeropress_type.map(|t| t.as_str()),
            recipe.plunge_time,
            p[0], p[1], p[2], p[3], p[4], p[5], p[6], p[7], p[8], p[9],
        ],
    )?;
    Ok(())
}

pub fn get_recipe(conn: &Connection, id: Uuid) -> Result<Option<Recipe>> {
    let recipe = conn
        .query_row(
            &format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?1"),
            [id],
            recipe_from_row,
        )
        .optional()?;
    Ok(recipe)
}

/// Delete a recipe; notes brewed with it are kept but detached
pub fn delete_recipe(conn: &Connection, id: Uuid) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

pub fn list_recipes(conn: &Connection, order: RecipeOrder) -> Result<Vec<Recipe>> {
    let order_by = match order {
        RecipeOrder::ByName => "name COLLATE NOCASE",
        RecipeOrder::ByUsage => "usage_count DESC, name COLLATE NOCASE",
    };
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY {order_by}"
    ))?;

    let rows = stmt.query_map([], recipe_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn find_recipe_by_name(conn: &Connection, name: &str) -> Result<Option<Recipe>> {
    let recipe = conn
        .query_row(
            &format!(
                "SELECT {RECIPE_COLUMNS} FROM recipes WHERE name = ?1 COLLATE NOCASE LIMIT 1"
            ),
            [name.trim()],
            recipe_from_row,
        )
        .optional()?;
    Ok(recipe)
}

// ---------------------------------------------------------------------------
// Brewing notes
// ---------------------------------------------------------------------------

const NOTE_COLUMNS: &str =
    "id, coffee_id, recipe_id, rating, tasting_notes, adjustments, brewed_at";

fn note_from_row(row: &Row) -> rusqlite::Result<BrewingNote> {
    Ok(BrewingNote {
        id: row.get(0)?,
        coffee_id: row.get(1)?,
        recipe_id: row.get(2)?,
        rating: row.get(3)?,
        tasting_notes: row.get(4)?,
        adjustments: row.get(5)?,
        brewed_at: row.get(6)?,
    })
}

pub fn insert_note(conn: &Connection, note: &BrewingNote) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO brewing_notes ({NOTE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            note.id,
            note.coffee_id,
            note.recipe_id,
            note.rating,
            note.tasting_notes,
            note.adjustments,
            note.brewed_at,
        ],
    )
    .context("Failed to insert brewing note")?;
    Ok(())
}

/// Notes for a coffee, newest first
pub fn notes_for_coffee(conn: &Connection, coffee_id: Uuid) -> Result<Vec<BrewingNote>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTE_COLUMNS} FROM brewing_notes WHERE coffee_id = ?1 ORDER BY brewed_at DESC"
    ))?;

    let rows = stmt.query_map([coffee_id], note_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

pub fn search_notes(conn: &Connection, query: &str) -> Result<Vec<BrewingNote>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NOTE_COLUMNS} FROM brewing_notes ORDER BY brewed_at DESC"
    ))?;

    let rows = stmt.query_map([], note_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        let note = row?;
        if note.matches(query) {
            results.push(note);
        }
    }
    Ok(results)
}

pub fn delete_note(conn: &Connection, id: Uuid) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM brewing_notes WHERE id = ?1", [id])?;
    Ok(deleted > 0)
}

/// Log a brew: store the note and bump its recipe's usage count together.
/// The note must name the recipe it was brewed with.
pub fn record_brew(conn: &Connection, note: &BrewingNote) -> Result<Recipe> {
    let recipe_id = note
        .recipe_id
        .context("A brew must be recorded against a recipe")?;
    let tx = conn.unchecked_transaction()?;

    let mut recipe = get_recipe(&tx, recipe_id)?
        .ok_or_else(|| JournalError::RecipeNotFound(recipe_id.to_string()))?;
    recipe.increment_usage_count();
    update_recipe(&tx, &recipe)?;
    insert_note(&tx, note)?;

    tx.commit()?;
    info!(
        "Logged brew of '{}' (used {} times)",
        recipe.name, recipe.usage_count
    );
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::average_rating;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn pour_over(name: &str) -> Recipe {
        let mut recipe = Recipe::new(name);
        recipe.pours[0] = Some(45.0);
        recipe.pours[1] = Some(150.0);
        recipe.pours[3] = Some(250.0);
        recipe
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = open();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_recipe_round_trip() {
        let conn = open();
        let mut recipe = pour_over("Hoffmann V60");
        recipe.usage_count = 3;
        insert_recipe(&conn, &recipe).unwrap();

        let loaded = get_recipe(&conn, recipe.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Hoffmann V60");
        assert_eq!(loaded.pours, recipe.pours);
        assert_eq!(loaded.pour_count(), 3);
        assert_eq!(loaded.usage_count, 3);
        assert_eq!(loaded.aeropress_type, None);
    }

    #[test]
    fn test_aeropress_type_persists() {
        let conn = open();
        let mut recipe = Recipe::new("Inverted AP");
        recipe.brewing_method = "Aeropress".to_string();
        recipe.aeropress_type = Some(AeropressType::Inverted);
        recipe.plunge_time = 90;
        insert_recipe(&conn, &recipe).unwrap();

        let loaded = find_recipe_by_name(&conn, "inverted ap").unwrap().unwrap();
        assert_eq!(loaded.aeropress_type, Some(AeropressType::Inverted));
        assert_eq!(loaded.display_method(), "Aeropress (Inverted)");
    }

    #[test]
    fn test_list_recipes_by_usage() {
        let conn = open();
        let mut a = Recipe::new("Alpha");
        a.usage_count = 1;
        let mut b = Recipe::new("Bravo");
        b.usage_count = 5;
        let c = Recipe::new("charlie");
        for r in [&a, &b, &c] {
            insert_recipe(&conn, r).unwrap();
        }

        let by_usage: Vec<_> = list_recipes(&conn, RecipeOrder::ByUsage)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(by_usage, vec!["Bravo", "Alpha", "charlie"]);

        let by_name: Vec<_> = list_recipes(&conn, RecipeOrder::ByName)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(by_name, vec!["Alpha", "Bravo", "charlie"]);
    }

    #[test]
    fn test_search_coffees() {
        let conn = open();
        let mut kenya = Coffee::new("Kieni");
        kenya.origin = Some("Kenya".to_string());
        let mut colombia = Coffee::new("El Paraiso");
        colombia.process = Some("Thermal shock".to_string());
        insert_coffee(&conn, &kenya).unwrap();
        insert_coffee(&conn, &colombia).unwrap();

        let found = search_coffees(&conn, "thermal").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "El Paraiso");

        assert_eq!(search_coffees(&conn, "").unwrap().len(), 2);
        assert!(search_coffees(&conn, "yemen").unwrap().is_empty());
    }

    #[test]
    fn test_update_coffee() {
        let conn = open();
        let mut coffee = Coffee::new("Gesha");
        insert_coffee(&conn, &coffee).unwrap();

        coffee.roaster = Some("Onyx".to_string());
        coffee.roast_date = chrono::NaiveDate::from_ymd_opt(2026, 10, 1);
        update_coffee(&conn, &coffee).unwrap();

        let loaded = get_coffee(&conn, coffee.id).unwrap().unwrap();
        assert_eq!(loaded.roaster.as_deref(), Some("Onyx"));
        assert_eq!(loaded.roast_date, coffee.roast_date);
    }

    #[test]
    fn test_record_brew_increments_usage() {
        let conn = open();
        let coffee = Coffee::new("Kieni");
        let recipe = pour_over("Daily V60");
        insert_coffee(&conn, &coffee).unwrap();
        insert_recipe(&conn, &recipe).unwrap();

        for rating in [4, 0, 5] {
            let note = BrewingNote::new(coffee.id, Some(recipe.id), rating);
            record_brew(&conn, &note).unwrap();
        }

        let loaded = get_recipe(&conn, recipe.id).unwrap().unwrap();
        assert_eq!(loaded.usage_count, 3);

        let notes = notes_for_coffee(&conn, coffee.id).unwrap();
        assert_eq!(notes.len(), 3);
        assert_eq!(average_rating(&notes), Some(4.5));
    }

    #[test]
    fn test_record_brew_unknown_recipe_rolls_back() {
        let conn = open();
        let coffee = Coffee::new("Kieni");
        insert_coffee(&conn, &coffee).unwrap();

        let note = BrewingNote::new(coffee.id, Some(Uuid::new_v4()), 3);
        assert!(record_brew(&conn, &note).is_err());
        assert!(notes_for_coffee(&conn, coffee.id).unwrap().is_empty());
    }

    #[test]
    fn test_record_brew_counts_the_note_recipe() {
        let conn = open();
        let coffee = Coffee::new("Kieni");
        let brewed = Recipe::new("Brewed");
        let other = Recipe::new("Other");
        insert_coffee(&conn, &coffee).unwrap();
        insert_recipe(&conn, &brewed).unwrap();
        insert_recipe(&conn, &other).unwrap();

        let note = BrewingNote::new(coffee.id, Some(brewed.id), 4);
        let updated = record_brew(&conn, &note).unwrap();
        assert_eq!(updated.id, brewed.id);

        assert_eq!(get_recipe(&conn, brewed.id).unwrap().unwrap().usage_count, 1);
        assert_eq!(get_recipe(&conn, other.id).unwrap().unwrap().usage_count, 0);
        let notes = notes_for_coffee(&conn, coffee.id).unwrap();
        assert_eq!(notes[0].recipe_id, Some(brewed.id));
    }

    #[test]
    fn test_record_brew_requires_recipe() {
        let conn = open();
        let coffee = Coffee::new("Kieni");
        let recipe = Recipe::new("Daily");
        insert_coffee(&conn, &coffee).unwrap();
        insert_recipe(&conn, &recipe).unwrap();

        let note = BrewingNote::new(coffee.id, None, 3);
        assert!(record_brew(&conn, &note).is_err());
        assert!(notes_for_coffee(&conn, coffee.id).unwrap().is_empty());
        assert_eq!(get_recipe(&conn, recipe.id).unwrap().unwrap().usage_count, 0);
    }

    #[test]
    fn test_delete_coffee_cascades_notes() {
        let conn = open();
        let coffee = Coffee::new("Short lived");
        insert_coffee(&conn, &coffee).unwrap();
        insert_note(&conn, &BrewingNote::new(coffee.id, None, 2)).unwrap();

        assert!(delete_coffee(&conn, coffee.id).unwrap());
        assert!(get_coffee(&conn, coffee.id).unwrap().is_none());
        assert!(search_notes(&conn, "").unwrap().is_empty());
        assert!(!delete_coffee(&conn, coffee.id).unwrap());
    }

    #[test]
    fn test_delete_recipe_detaches_notes() {
        let conn = open();
        let coffee = Coffee::new("Kieni");
        let recipe = Recipe::new("Gone");
        insert_coffee(&conn, &coffee).unwrap();
        insert_recipe(&conn, &recipe).unwrap();

        let mut note = BrewingNote::new(coffee.id, Some(recipe.id), 4);
        note.tasting_notes = Some("Blackcurrant, tomato".to_string());
        insert_note(&conn, &note).unwrap();

        assert!(delete_recipe(&conn, recipe.id).unwrap());
        let notes = search_notes(&conn, "blackcurrant").unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].recipe_id, None);

        assert!(delete_note(&conn, note.id).unwrap());
    }

    #[test]
    fn test_clear_all() {
        let conn = open();
        insert_coffee(&conn, &Coffee::new("A")).unwrap();
        insert_recipe(&conn, &Recipe::new("B")).unwrap();
        clear_all(&conn).unwrap();
        assert!(list_coffees(&conn).unwrap().is_empty());
        assert!(list_recipes(&conn, RecipeOrder::ByName).unwrap().is_empty());
    }
}
