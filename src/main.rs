//! Tomatillo CLI - command-line front-end for the movie rating provider

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use rusqlite::types::Value;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tomatillo::config::{self, TomatilloConfig};
use tomatillo::contract::{self, Movie, MovieValues};
use tomatillo::provider::{InsertResult, MovieProvider, RowSet};
use tomatillo::seed;
use tomatillo::storage::MovieDbHelper;
use tomatillo::ui;
use tomatillo::uri::MovieUri;

#[derive(Parser)]
#[command(name = "tomatillo")]
#[command(version = "0.1.0")]
#[command(about = "Movie rating catalog behind a URI-addressed data provider")]
#[command(long_about = r#"
Tomatillo keeps a small movie rating catalog in SQLite behind a
URI-addressed provider, so every read and write goes through the same
validated CRUD surface.

Example usage:
  tomatillo seed
  tomatillo list --sort "rating DESC"
  tomatillo add --title "Paprika" --rating 4
  tomatillo rate --id 3 --rating 5
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Path to the database file (overrides tomatillo.toml)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter tomatillo.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Load the sample catalog (safe to re-run; duplicates are skipped)
    Seed,

    /// List every movie in the catalog
    List {
        /// Sort expression, e.g. "rating DESC" or "title"
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Show a single movie by id
    Show {
        #[arg(short, long)]
        id: i64,
    },

    /// Add a movie to the catalog
    Add {
        #[arg(short, long)]
        title: String,

        /// Rating between 0 and 5
        #[arg(short, long)]
        rating: i64,
    },

    /// Change a movie's rating
    Rate {
        #[arg(short, long)]
        id: i64,

        /// New rating between 0 and 5
        #[arg(short, long)]
        rating: i64,
    },

    /// Delete one movie by id, or the whole catalog with --all
    Delete {
        #[arg(short, long)]
        id: Option<i64>,

        /// Delete every movie
        #[arg(long)]
        all: bool,
    },

    /// Print the MIME types for the collection and item addresses
    Types,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("tomatillo=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    match cli.command {
        Commands::Init { force } => {
            let config = TomatilloConfig {
                database: Some(config::default_database_path_in(Path::new(".")).display().to_string()),
                authority: Some(contract::DEFAULT_AUTHORITY.to_string()),
            };
            let path = config::default_config_path();
            config::write_config(&path, &config, force)?;
            println!("✅ Wrote {}", path.display());
        }

        Commands::Seed => {
            let provider = open_provider(cli.database)?;
            let accepted = seed::run(&provider)?;
            let skipped = seed::SAMPLE_MOVIES.len() - accepted;
            if cli.json {
                println!("{}", serde_json::json!({ "accepted": accepted, "skipped": skipped }));
            } else {
                println!("🌱 Seeded {} movies ({} already present)", accepted, skipped);
            }
        }

        Commands::List { sort } => {
            let provider = open_provider(cli.database)?;
            let rows = provider.query(&provider.collection_uri(), None, None, &[], sort.as_deref())?;
            let movies = movies_from(&rows);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&movies)?);
            } else if movies.is_empty() {
                println!("∅ The catalog is empty. Try `tomatillo seed`.");
            } else {
                println!("{}", ui::movie_table(&movies));
            }
        }

        Commands::Show { id } => {
            let provider = open_provider(cli.database)?;
            let item = provider.collection_uri().with_id(id);
            let rows = provider.query(&item, None, None, &[], None)?;
            let movies = movies_from(&rows);
            match movies.first() {
                None => println!("∅ No movie with id {}.", id),
                Some(movie) if cli.json => println!("{}", serde_json::to_string_pretty(movie)?),
                Some(movie) => {
                    println!("{} {}", movie.title.bold(), ui::stars(movie.rating));
                    println!("  URI: {}", item);
                }
            }
        }

        Commands::Add { title, rating } => {
            let provider = open_provider(cli.database)?;
            let values = MovieValues::new().with_title(&title).with_rating(rating);
            match provider.insert(&provider.collection_uri(), &values)? {
                InsertResult::Created(item) => {
                    if cli.json {
                        println!("{}", serde_json::json!({ "created": item }));
                    } else {
                        println!("✅ Added {} {}", title.bold(), ui::stars(rating));
                        println!("  URI: {}", item);
                    }
                }
                InsertResult::Conflict => {
                    if cli.json {
                        println!("{}", serde_json::json!({ "conflict": title }));
                    } else {
                        println!("⚠️  {} is already in the catalog.", title.bold());
                    }
                }
            }
        }

        Commands::Rate { id, rating } => {
            let provider = open_provider(cli.database)?;
            let item = provider.collection_uri().with_id(id);
            let values = MovieValues::new().with_rating(rating);
            let affected = provider.update(&item, &values, None, &[])?;
            if affected == 0 {
                println!("∅ No movie with id {}.", id);
            } else {
                // Re-query so the output reflects what the store now holds.
                let rows = provider.query(&item, None, None, &[], None)?;
                match movies_from(&rows).first() {
                    Some(movie) if cli.json => println!("{}", serde_json::to_string_pretty(movie)?),
                    Some(movie) => println!("✅ {} is now {}", movie.title.bold(), ui::stars(movie.rating)),
                    None => {}
                }
            }
        }

        Commands::Delete { id, all } => {
            let provider = open_provider(cli.database)?;
            let affected = match (id, all) {
                (Some(id), false) => provider.delete(&provider.collection_uri().with_id(id), None, &[])?,
                (None, true) => provider.delete(&provider.collection_uri(), None, &[])?,
                _ => anyhow::bail!("pass exactly one of --id or --all"),
            };
            if cli.json {
                println!("{}", serde_json::json!({ "deleted": affected }));
            } else {
                println!("🗑️  Deleted {} movie(s).", affected);
            }
        }

        Commands::Types => {
            // Type tags derive purely from address shape; no store access.
            let config = config::load_config(None)?.unwrap_or_default();
            let authority = config.authority.unwrap_or_else(|| contract::DEFAULT_AUTHORITY.to_string());
            let collection = MovieUri::collection(authority.clone());
            println!("{}  {}", contract::content_dir_type(&authority), collection);
            println!("{}  content://{}/movie/<id>", contract::content_item_type(&authority), authority);
        }
    }

    Ok(())
}

/// Wire up the provider from config, CLI override, and defaults.
fn open_provider(database: Option<PathBuf>) -> anyhow::Result<MovieProvider> {
    let config = config::load_config(None)?.unwrap_or_default();

    let db_path = database
        .or_else(|| config.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| config::default_database_path_in(Path::new(".")));
    config::ensure_db_dir(&db_path)?;

    let authority = config.authority.unwrap_or_else(|| contract::DEFAULT_AUTHORITY.to_string());

    let helper = MovieDbHelper::open(&db_path)?;
    Ok(MovieProvider::new(helper, authority))
}

/// Map full-projection rows into movies, in result order.
fn movies_from(rows: &RowSet) -> Vec<Movie> {
    rows.rows()
        .filter_map(|row| match row {
            [Value::Integer(id), Value::Text(title), Value::Integer(rating)] => Some(Movie {
                id: *id,
                title: title.clone(),
                rating: *rating,
            }),
            _ => None,
        })
        .collect()
}
