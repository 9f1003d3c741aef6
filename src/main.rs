//! Old World Builder - command line entry point
//!
//! Resolves army rosters against a composition and prints what the
//! add-unit screen would offer.

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use old_world_builder::catalog::GameCatalog;
use old_world_builder::core::config::{config, set_config, BuilderConfig};
use old_world_builder::core::error::Result;
use old_world_builder::list::ArmyList;
use old_world_builder::roster::{ResolvedRoster, Section, Unit};
use old_world_builder::source::source_from_config;
use old_world_builder::view::AddUnitView;

/// Army roster resolver
#[derive(Parser, Debug)]
#[command(name = "old-world-builder")]
#[command(about = "Resolve army rosters and list the units a list can take")]
struct Args {
    /// Config file (TOML); defaults to $OWB_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Display language, overrides the config
    #[arg(long, global = true)]
    language: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one army with a composition
    Resolve {
        #[arg(long)]
        game: String,

        #[arg(long)]
        army: String,

        /// Composition to apply; the army itself when omitted
        #[arg(long)]
        composition: Option<String>,
    },
    /// Resolve every allied army of an army
    Allies {
        #[arg(long)]
        game: String,

        #[arg(long)]
        army: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct AllyOutput<'a> {
    ally: &'a str,
    name: &'a str,
    roster: &'a ResolvedRoster,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("old_world_builder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut loaded = match &args.config {
        Some(path) => BuilderConfig::load(path)?,
        None => BuilderConfig::from_env_or_default()?,
    };
    if let Some(language) = &args.language {
        loaded.language = language.clone();
    }
    if set_config(loaded).is_err() {
        tracing::warn!("Config already initialised");
    }
    let config = config();

    let catalog = Arc::new(GameCatalog::load(&config.catalog_path)?);
    let source = source_from_config(config)?;
    let mut view = AddUnitView::new(source, Arc::clone(&catalog), &config.language);

    match args.command {
        Command::Resolve {
            game,
            army,
            composition,
        } => {
            let mut list = ArmyList::new("cli", game, army);
            if let Some(composition) = composition {
                list = list.with_composition(composition);
            }

            view.navigate(&format!("/add/{}", list.id));
            let roster = view.load_army(&list).await?;
            match args.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(roster)?),
                Format::Text => print_roster(roster, &config.language),
            }
        }
        Command::Allies { game, army } => {
            let list = ArmyList::new("cli", game, army);
            view.navigate(&format!("/add/{}/allies", list.id));
            let accepted = view.load_allies(&list).await?;
            tracing::info!("Loaded {} allied rosters", accepted);

            match args.format {
                Format::Json => {
                    let output: Vec<AllyOutput> = view
                        .ally_rosters()
                        .iter()
                        .map(|entry| AllyOutput {
                            ally: &entry.ally,
                            name: catalog
                                .army_name(&list.game, &entry.ally, &config.language)
                                .unwrap_or(entry.ally.as_str()),
                            roster: &entry.roster,
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                Format::Text => {
                    for group in view.ally_groups(&list.game) {
                        println!("== {} ==", group.name);
                        for unit in group.units {
                            print_unit(unit, &config.language);
                        }
                        println!();
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_roster(roster: &ResolvedRoster, language: &str) {
    for section in Section::ALL {
        let units = roster.section(section);
        if units.is_empty() {
            continue;
        }
        println!("== {} ==", section);
        for unit in units {
            print_unit(unit, language);
        }
        println!();
    }
}

fn print_unit(unit: &Unit, language: &str) {
    println!(
        "  {:<40} {:>5} pts  [{}]",
        unit.label(language),
        unit.points_cost(),
        unit.id
    );
}
