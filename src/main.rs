//! Brew Journal
//!
//! A personal coffee brewing journal: coffees, recipes and tasting notes.

mod db;
mod error;
mod import;
mod logger;
mod models;
mod recipe;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::RecipeOrder;
use crate::models::{or_unset, AeropressType, BrewingNote, Coffee, Recipe, POUR_SLOTS};
use crate::settings::{EquipmentKind, EquipmentSettings, FileSettingsStore, SettingsStore};

#[derive(Parser)]
#[command(name = "brew-journal")]
#[command(about = "Personal coffee brewing journal")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "brew_journal.db")]
    database: PathBuf,

    /// Path to the equipment settings file
    #[arg(short, long, default_value = "brew_settings.toml")]
    settings: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// Load sample coffees and recipes
    LoadSample,

    /// Add a coffee to the catalog, or update the one with the same name
    AddCoffee {
        name: String,
        #[arg(long)]
        roaster: Option<String>,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        process: Option<String>,
        #[arg(long)]
        roast_level: Option<String>,
        /// Roast date (YYYY-MM-DD)
        #[arg(long)]
        roast_date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List coffees, optionally filtered
    Coffees {
        /// Case-insensitive search across name, roaster, origin, process and notes
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a brewing recipe
    AddRecipe(RecipeArgs),

    /// List recipes
    Recipes {
        /// Most used first
        #[arg(long)]
        by_usage: bool,
    },

    /// Show details for a recipe
    Recipe { name: String },

    /// Log a brewing session
    Brew {
        recipe: String,
        coffee: String,

        /// Star rating, 1-5 (0 = unrated)
        #[arg(short, long, default_value = "0")]
        rating: i32,

        /// Tasting notes
        #[arg(short, long)]
        notes: Option<String>,

        /// What to change next time
        #[arg(short, long)]
        adjustments: Option<String>,
    },

    /// Show brewing notes for a coffee
    Notes { coffee: String },

    /// Search tasting notes and adjustments across all brews
    Search { query: String },

    /// Delete a coffee together with its notes
    DeleteCoffee { name: String },

    /// Delete a recipe; its notes are kept
    DeleteRecipe { name: String },

    /// Delete a single brewing note by id
    DeleteNote { id: Uuid },

    /// Import recipes from a directory of TOML files
    Import { dir: PathBuf },

    /// Manage enabled brewing methods and grinders
    Equipment {
        #[command(subcommand)]
        action: EquipmentAction,
    },
}

#[derive(Args)]
struct RecipeArgs {
    name: String,

    /// Brewing method (defaults to the first enabled method)
    #[arg(short, long)]
    method: Option<String>,

    /// Grinder (defaults to the first enabled grinder)
    #[arg(short, long)]
    grinder: Option<String>,

    #[arg(long)]
    grind_size: Option<i32>,

    /// Water temperature in °C
    #[arg(long)]
    water_temp: Option<i32>,

    /// Coffee dose in grams
    #[arg(long)]
    dose: Option<f64>,

    /// Total brew time in seconds
    #[arg(long)]
    brew_time: Option<i32>,

    #[arg(long)]
    bloom_time: Option<i32>,

    /// Cumulative pour weights in grams, bloom first (e.g. 45,150,250)
    #[arg(long, value_delimiter = ',')]
    pours: Vec<f64>,

    /// Espresso yield in grams
    #[arg(long)]
    water_out: Option<f64>,

    /// Aeropress orientation: Normal or Inverted
    #[arg(long)]
    aeropress_type: Option<AeropressType>,

    #[arg(long)]
    plunge_time: Option<i32>,

    /// Save even if pours do not strictly increase
    #[arg(long)]
    allow_invalid_pours: bool,

    /// Accept methods and grinders that are not enabled in settings
    #[arg(long)]
    any_equipment: bool,
}

#[derive(Subcommand)]
enum EquipmentAction {
    /// Show all equipment and whether it is enabled
    List,
    Enable { kind: EquipmentKind, name: String },
    Disable { kind: EquipmentKind, name: String },
    /// Add new equipment (enabled)
    Add { kind: EquipmentKind, name: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let store = FileSettingsStore::new(&cli.settings);

    // Equipment lives in the settings file only
    let command = match cli.command {
        Commands::Equipment { action } => return run_equipment(&store, action),
        command => command,
    };

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match command {
        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }

        Commands::AddCoffee {
            name,
            roaster,
            origin,
            process,
            roast_level,
            roast_date,
            notes,
        } => {
            let existing = db::find_coffee_by_name(&conn, &name)?;
            let is_new = existing.is_none();
            let mut coffee = existing.unwrap_or_else(|| Coffee::new(name));

            // Only overwrite what was given on the command line
            coffee.roaster = roaster.or(coffee.roaster);
            coffee.origin = origin.or(coffee.origin);
            coffee.process = process.or(coffee.process);
            coffee.roast_level = roast_level.or(coffee.roast_level);
            coffee.roast_date = roast_date.or(coffee.roast_date);
            coffee.notes = notes.or(coffee.notes);

            if is_new {
                db::insert_coffee(&conn, &coffee)?;
                println!("Added coffee '{}'", coffee.name);
            } else {
                db::update_coffee(&conn, &coffee)?;
                println!("Updated coffee '{}'", coffee.name);
            }
        }

        Commands::Coffees { search } => {
            let coffees = match search.as_deref() {
                Some(query) => db::search_coffees(&conn, query)?,
                None => db::list_coffees(&conn)?,
            };
            if coffees.is_empty() {
                println!("No coffees found. Run 'add-coffee' or 'load-sample' first.");
            } else {
                println!(
                    "{:<24} {:<20} {:<14} {:<12} {:>6}",
                    "Coffee", "Roaster", "Origin", "Roasted", "Rating"
                );
                println!("{}", "-".repeat(80));
                for c in coffees {
                    let notes = db::notes_for_coffee(&conn, c.id)?;
                    let rating = recipe::average_rating(&notes)
                        .map(|r| format!("{:.1}", r))
                        .unwrap_or_else(|| "-".to_string());
                    let roasted = c
                        .roast_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<24} {:<20} {:<14} {:<12} {:>6}",
                        c.name,
                        or_unset(&c.roaster),
                        or_unset(&c.origin),
                        roasted,
                        rating
                    );
                }
            }
        }

        Commands::AddRecipe(args) => {
            let settings = store.load()?;
            let recipe = build_recipe(&settings, args)?;

            db::insert_recipe(&conn, &recipe)?;
            println!(
                "Added recipe '{}' ({}, final weight {:.1}g)",
                recipe.name,
                recipe.display_method(),
                recipe.final_weight()
            );
        }

        Commands::Recipes { by_usage } => {
            let order = if by_usage {
                RecipeOrder::ByUsage
            } else {
                RecipeOrder::ByName
            };
            let recipes = db::list_recipes(&conn, order)?;
            if recipes.is_empty() {
                println!("No recipes in database. Run 'add-recipe' or 'load-sample' first.");
            } else {
                println!(
                    "{:<26} {:<38} {:>8} {:>6}",
                    "Recipe", "Method", "Yield", "Used"
                );
                println!("{}", "-".repeat(81));
                for r in recipes {
                    println!(
                        "{:<26} {:<38} {:>7.0}g {:>6}",
                        r.name,
                        r.display_method(),
                        r.final_weight(),
                        r.usage_count
                    );
                }
            }
        }

        Commands::Recipe { name } => match db::find_recipe_by_name(&conn, &name)? {
            Some(r) => print!("{}", r.describe()),
            None => println!("Recipe '{}' not found", name),
        },

        Commands::Brew {
            recipe,
            coffee,
            rating,
            notes,
            adjustments,
        } => {
            let recipe = db::find_recipe_by_name(&conn, &recipe)?
                .ok_or_else(|| error::JournalError::RecipeNotFound(recipe.clone()))?;
            let coffee = db::find_coffee_by_name(&conn, &coffee)?
                .with_context(|| format!("Coffee '{}' not found", coffee))?;

            let mut note = BrewingNote::new(coffee.id, Some(recipe.id), rating);
            note.tasting_notes = notes;
            note.adjustments = adjustments;

            let updated = db::record_brew(&conn, &note)?;
            println!(
                "Logged {} with {} {} (recipe used {} times)",
                coffee.name,
                updated.name,
                note.stars(),
                updated.usage_count
            );
        }

        Commands::Notes { coffee } => {
            let Some(coffee) = db::find_coffee_by_name(&conn, &coffee)? else {
                println!("Coffee '{}' not found", coffee);
                return Ok(());
            };

            let notes = db::notes_for_coffee(&conn, coffee.id)?;
            println!("Coffee: {}", coffee.name);
            println!("  Roaster: {}", or_unset(&coffee.roaster));
            println!("  Origin: {}", or_unset(&coffee.origin));
            println!("  Process: {}", or_unset(&coffee.process));
            match recipe::average_rating(&notes) {
                Some(avg) => println!("  Average rating: {:.1} ({} brews)", avg, notes.len()),
                None => println!("  Average rating: - ({} brews)", notes.len()),
            }

            for note in notes {
                let recipe_name = match note.recipe_id {
                    Some(id) => db::get_recipe(&conn, id)?.map(|r| r.name),
                    None => None,
                };
                println!(
                    "\n  {} {} {}",
                    note.brewed_at.format("%Y-%m-%d %H:%M"),
                    note.stars(),
                    or_unset(&recipe_name)
                );
                println!("    Tasting: {}", or_unset(&note.tasting_notes));
                println!("    Next time: {}", or_unset(&note.adjustments));
            }
        }

        Commands::Search { query } => {
            let notes = db::search_notes(&conn, &query)?;
            if notes.is_empty() {
                println!("No notes matching '{}'", query);
            }
            for note in notes {
                let coffee_name = db::get_coffee(&conn, note.coffee_id)?.map(|c| c.name);
                println!(
                    "{} {} {} [{}]",
                    note.brewed_at.format("%Y-%m-%d"),
                    note.stars(),
                    or_unset(&coffee_name),
                    note.id
                );
                println!("    Tasting: {}", or_unset(&note.tasting_notes));
                println!("    Next time: {}", or_unset(&note.adjustments));
            }
        }

        Commands::DeleteCoffee { name } => match db::find_coffee_by_name(&conn, &name)? {
            Some(c) => {
                db::delete_coffee(&conn, c.id)?;
                println!("Deleted coffee '{}' and its notes", c.name);
            }
            None => println!("Coffee '{}' not found", name),
        },

        Commands::DeleteRecipe { name } => match db::find_recipe_by_name(&conn, &name)? {
            Some(r) => {
                db::delete_recipe(&conn, r.id)?;
                println!("Deleted recipe '{}'", r.name);
            }
            None => println!("Recipe '{}' not found", name),
        },

        Commands::DeleteNote { id } => {
            if db::delete_note(&conn, id)? {
                println!("Deleted note {}", id);
            } else {
                println!("Note {} not found", id);
            }
        }

        Commands::Import { dir } => {
            let stats = import::import_directory(&conn, &dir)?;
            println!("\n{}", stats);
        }

        Commands::Equipment { .. } => unreachable!("handled before opening the database"),
    }

    Ok(())
}

/// Assemble a recipe from command-line arguments. Equipment must be enabled
/// and pours must strictly increase unless the matching override is set.
fn build_recipe(settings: &EquipmentSettings, args: RecipeArgs) -> Result<Recipe> {
    let mut recipe = Recipe::new(args.name);
    recipe.brewing_method =
        resolve_equipment(settings, EquipmentKind::Method, args.method, args.any_equipment)?;
    recipe.grinder =
        resolve_equipment(settings, EquipmentKind::Grinder, args.grinder, args.any_equipment)?;
    recipe.grind_size = args.grind_size.unwrap_or(recipe.grind_size);
    recipe.water_temp = args.water_temp.unwrap_or(recipe.water_temp);
    recipe.dose = args.dose.unwrap_or(recipe.dose);
    recipe.brew_time = args.brew_time.unwrap_or(recipe.brew_time);
    recipe.bloom_time = args.bloom_time.unwrap_or(recipe.bloom_time);
    recipe.water_out = args.water_out.unwrap_or(recipe.water_out);
    recipe.aeropress_type = args.aeropress_type;
    recipe.plunge_time = args.plunge_time.unwrap_or(recipe.plunge_time);

    if args.pours.len() > POUR_SLOTS {
        bail!(
            "At most {} pours are supported, got {}",
            POUR_SLOTS,
            args.pours.len()
        );
    }
    for (slot, amount) in args.pours.into_iter().enumerate() {
        recipe.pours[slot] = Some(amount).filter(|v| *v > 0.0);
    }

    if recipe.supports_pours() && !recipe.has_valid_pour_sequence() {
        if !args.allow_invalid_pours {
            bail!(
                "Each pour must weigh more than the one before it. \
                 Use --allow-invalid-pours to save anyway."
            );
        }
        tracing::warn!("Saving '{}' with non-increasing pours", recipe.name);
    }

    Ok(recipe)
}

/// Pick the requested equipment, or the first enabled item when none is given
fn resolve_equipment(
    settings: &EquipmentSettings,
    kind: EquipmentKind,
    requested: Option<String>,
    any_equipment: bool,
) -> Result<String> {
    match requested {
        Some(name) if any_equipment => Ok(name),
        Some(name) => match settings.find_enabled(kind, &name) {
            Some(found) => Ok(found.to_string()),
            None => bail!(
                "{} '{}' is not enabled (enabled: {}). Use --any-equipment to override.",
                kind,
                name,
                settings.enabled(kind).join(", ")
            ),
        },
        None => settings
            .enabled(kind)
            .first()
            .map(|s| s.to_string())
            .with_context(|| format!("No {} enabled", kind)),
    }
}

fn run_equipment(store: &FileSettingsStore, action: EquipmentAction) -> Result<()> {
    let mut settings = store.load()?;

    match action {
        EquipmentAction::List => {
            for kind in [EquipmentKind::Method, EquipmentKind::Grinder] {
                println!("{}s:", capitalize(&kind.to_string()));
                for item in settings.items(kind) {
                    let mark = if item.enabled { "x" } else { " " };
                    println!("  [{}] {}", mark, item.name);
                }
            }
            return Ok(());
        }
        EquipmentAction::Enable { kind, name } => settings.set_enabled(kind, &name, true)?,
        EquipmentAction::Disable { kind, name } => settings.set_enabled(kind, &name, false)?,
        EquipmentAction::Add { kind, name } => settings.add(kind, &name)?,
    }

    store.save(&settings)?;
    println!("Settings saved to {}", store.path().display());
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Load sample coffees and recipes for trying out the journal
fn load_sample_data(conn: &Connection) -> Result<()> {
    db::clear_all(conn)?;

    let mut kieni = Coffee::new("Kieni AA");
    kieni.roaster = Some("Square Mile".to_string());
    kieni.origin = Some("Kenya".to_string());
    kieni.process = Some("Washed".to_string());
    kieni.roast_level = Some("Light".to_string());
    kieni.notes = Some("Blackcurrant, grapefruit".to_string());
    db::insert_coffee(conn, &kieni)?;

    let mut paraiso = Coffee::new("El Paraiso Lychee");
    paraiso.roaster = Some("Onyx".to_string());
    paraiso.origin = Some("Colombia".to_string());
    paraiso.process = Some("Thermal shock".to_string());
    paraiso.roast_level = Some("Light".to_string());
    db::insert_coffee(conn, &paraiso)?;

    let mut house = Coffee::new("House Espresso");
    house.roaster = Some("Local".to_string());
    house.origin = Some("Brazil / Ethiopia".to_string());
    house.roast_level = Some("Medium".to_string());
    db::insert_coffee(conn, &house)?;

    // Five-pour V60
    let mut v60 = Recipe::new("Daily V60");
    v60.brewing_method = "V60-02".to_string();
    v60.dose = 15.0;
    v60.bloom_time = 45;
    v60.brew_time = 210;
    for (slot, amount) in [45.0, 100.0, 150.0, 200.0, 250.0].into_iter().enumerate() {
        v60.pours[slot] = Some(amount);
    }
    db::insert_recipe(conn, &v60)?;

    let mut kalita = Recipe::new("Kalita Pulse");
    kalita.brewing_method = "Kalita Wave 155".to_string();
    kalita.grinder = "1Zpresso J-Max".to_string();
    kalita.dose = 20.0;
    for (slot, amount) in [50.0, 150.0, 220.0, 300.0].into_iter().enumerate() {
        kalita.pours[slot] = Some(amount);
    }
    db::insert_recipe(conn, &kalita)?;

    let mut espresso = Recipe::new("Classic Shot");
    espresso.brewing_method = "Espresso (Gaggia Classic Pro)".to_string();
    espresso.grinder = "Niche Zero".to_string();
    espresso.grind_size = 12;
    espresso.water_temp = 93;
    espresso.dose = 18.0;
    espresso.brew_time = 28;
    espresso.water_out = 36.0;
    db::insert_recipe(conn, &espresso)?;

    let mut aeropress = Recipe::new("Inverted Aeropress");
    aeropress.brewing_method = "Aeropress".to_string();
    aeropress.grind_size = 18;
    aeropress.dose = 16.0;
    aeropress.aeropress_type = Some(AeropressType::Inverted);
    aeropress.plunge_time = 90;
    aeropress.pours[0] = Some(50.0);
    aeropress.pours[1] = Some(230.0);
    db::insert_recipe(conn, &aeropress)?;

    let mut french = Recipe::new("Hoffmann French Press");
    french.brewing_method = "French Press".to_string();
    french.grinder = "Baratza Encore".to_string();
    french.grind_size = 28;
    french.dose = 30.0;
    french.brew_time = 540;
    db::insert_recipe(conn, &french)?;

    let mut note = BrewingNote::new(kieni.id, Some(v60.id), 5);
    note.tasting_notes = Some("Juicy, blackcurrant and cola".to_string());
    db::record_brew(conn, &note)?;

    let mut note = BrewingNote::new(house.id, Some(espresso.id), 3);
    note.adjustments = Some("Sour, grind finer".to_string());
    db::record_brew(conn, &note)?;

    println!(
        "Loaded {} sample coffees and {} sample recipes",
        db::list_coffees(conn)?.len(),
        db::list_recipes(conn, RecipeOrder::ByName)?.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct AddRecipeCli {
        #[command(flatten)]
        args: RecipeArgs,
    }

    fn args(argv: &[&str]) -> RecipeArgs {
        let argv = std::iter::once("add-recipe").chain(argv.iter().copied());
        AddRecipeCli::try_parse_from(argv).unwrap().args
    }

    fn settings_without(kind: EquipmentKind, disabled: &[&str]) -> EquipmentSettings {
        let mut settings = EquipmentSettings::default();
        for name in disabled {
            settings.set_enabled(kind, name, false).unwrap();
        }
        settings
    }

    #[test]
    fn test_defaults_to_first_enabled_equipment() {
        let settings = settings_without(EquipmentKind::Method, &["V60-01"]);
        let recipe = build_recipe(&settings, args(&["Morning"])).unwrap();
        assert_eq!(recipe.brewing_method, "V60-02");
        assert_eq!(recipe.grinder, "Comandante C40");
    }

    #[test]
    fn test_equipment_matched_case_insensitively() {
        let settings = EquipmentSettings::default();
        let recipe = build_recipe(
            &settings,
            args(&["Chemex", "--method", "chemex", "--grinder", "NICHE ZERO"]),
        )
        .unwrap();
        assert_eq!(recipe.brewing_method, "Chemex");
        assert_eq!(recipe.grinder, "Niche Zero");
    }

    #[test]
    fn test_disabled_or_unknown_equipment_rejected() {
        let settings = settings_without(EquipmentKind::Method, &["Chemex"]);
        assert!(build_recipe(&settings, args(&["A", "--method", "Chemex"])).is_err());
        assert!(build_recipe(&settings, args(&["B", "--method", "Clever Dripper"])).is_err());
        assert!(build_recipe(&settings, args(&["C", "--grinder", "Kinu M47"])).is_err());
    }

    #[test]
    fn test_any_equipment_overrides_settings() {
        let settings = settings_without(EquipmentKind::Method, &["Chemex"]);
        let recipe = build_recipe(
            &settings,
            args(&[
                "Loose",
                "--method",
                "Chemex",
                "--grinder",
                "Kinu M47",
                "--any-equipment",
            ]),
        )
        .unwrap();
        assert_eq!(recipe.brewing_method, "Chemex");
        assert_eq!(recipe.grinder, "Kinu M47");
    }

    #[test]
    fn test_invalid_pours_rejected() {
        let settings = EquipmentSettings::default();
        assert!(build_recipe(&settings, args(&["Flat", "--pours", "40,60,60"])).is_err());
        assert!(build_recipe(&settings, args(&["Low", "--pours", "40,30,120"])).is_err());
    }

    #[test]
    fn test_allow_invalid_pours_override() {
        let settings = EquipmentSettings::default();
        let recipe = build_recipe(
            &settings,
            args(&["Flat", "--pours", "40,60,60", "--allow-invalid-pours"]),
        )
        .unwrap();
        assert!(!recipe.has_valid_pour_sequence());
        assert_eq!(recipe.pour_count(), 3);
    }

    #[test]
    fn test_pours_ignored_for_espresso() {
        let settings = EquipmentSettings::default();
        let recipe = build_recipe(
            &settings,
            args(&[
                "Shot",
                "--method",
                "espresso (gaggia classic pro)",
                "--pours",
                "40,30",
                "--water-out",
                "36",
            ]),
        )
        .unwrap();
        assert!(recipe.is_espresso());
        assert_eq!(recipe.final_weight(), 36.0);
    }

    #[test]
    fn test_valid_pours_and_limits() {
        let settings = EquipmentSettings::default();
        let recipe = build_recipe(
            &settings,
            args(&["Daily", "--pours", "45,0,150,250", "--dose", "16.5"]),
        )
        .unwrap();
        assert_eq!(recipe.pour_count(), 3);
        assert_eq!(recipe.final_weight(), 250.0);
        assert_eq!(recipe.dose, 16.5);

        let eleven = "10,20,30,40,50,60,70,80,90,100,110";
        assert!(build_recipe(&settings, args(&["Eleven", "--pours", eleven])).is_err());
    }

    #[test]
    fn test_aeropress_type_flag_any_case() {
        let settings = EquipmentSettings::default();
        let recipe = build_recipe(
            &settings,
            args(&["AP", "--method", "aeropress", "--aeropress-type", "inverted"]),
        )
        .unwrap();
        assert_eq!(recipe.display_method(), "Aeropress (Inverted)");
    }

    #[test]
    fn test_load_sample_data_replaces_contents() {
        let conn = Connection::open_in_memory().unwrap();
        db::init_schema(&conn).unwrap();
        db::insert_coffee(&conn, &Coffee::new("Leftover")).unwrap();

        load_sample_data(&conn).unwrap();
        load_sample_data(&conn).unwrap();

        let coffees = db::list_coffees(&conn).unwrap();
        assert_eq!(coffees.len(), 3);
        assert!(coffees.iter().all(|c| c.name != "Leftover"));

        let recipes = db::list_recipes(&conn, RecipeOrder::ByUsage).unwrap();
        assert_eq!(recipes.len(), 5);
        assert!(recipes.iter().all(|r| r.has_valid_pour_sequence()));
        assert_eq!(recipes.iter().map(|r| r.usage_count).sum::<i64>(), 2);
    }
}
