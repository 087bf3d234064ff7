//! `lightbnb` CLI entry-point.
//!
//! Available sub-commands:
//! - `migrate`       — run pending database migrations.
//! - `user`          — look a user up by email or id.
//! - `add-user`      — register a user.
//! - `reservations`  — list a guest's past reservations.
//! - `properties`    — search properties.
//! - `add-property`  — create a listing.
//!
//! With `--fixtures <dir>` every query runs against an in-memory store seeded
//! from `<dir>/users.json` and `<dir>/properties.json` instead of Postgres.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use db::filter::dollars_to_cents;
use db::models::{NewProperty, NewUser};
use db::{DbConfig, PropertyFilter};
use gateway::QueryGateway;
use store::{MemoryStore, PgStore, RentalStore};

#[derive(Parser)]
#[command(
    name = "lightbnb",
    about = "Query and populate the LightBnB rental database",
    version
)]
struct Cli {
    /// Postgres connection string. Falls back to the PG* variables.
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Serve from JSON fixtures in this directory instead of Postgres.
    /// Takes precedence over any database setting.
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations.
    Migrate,
    /// Look a user up by email or id.
    User {
        #[arg(long, required_unless_present = "id", conflicts_with = "id")]
        email: Option<String>,
        #[arg(long)]
        id: Option<i32>,
    },
    /// Register a user. The password is stored as given and should already be hashed.
    AddUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a guest's past reservations, oldest first.
    Reservations {
        #[arg(long)]
        guest_id: i32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Search properties, cheapest first.
    Properties {
        /// Substring of the city name (case-insensitive).
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        owner_id: Option<i32>,
        #[arg(long)]
        minimum_rating: Option<f64>,
        /// Lowest nightly price in dollars.
        #[arg(long, value_parser = parse_dollars)]
        minimum_price: Option<f64>,
        /// Highest nightly price in dollars.
        #[arg(long, value_parser = parse_dollars)]
        maximum_price: Option<f64>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Create a listing.
    AddProperty(PropertyArgs),
}

#[derive(clap::Args)]
struct PropertyArgs {
    #[arg(long)]
    owner_id: i32,
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    thumbnail_photo_url: String,
    #[arg(long)]
    cover_photo_url: String,
    /// Nightly price in dollars; stored in cents.
    #[arg(long)]
    price: f64,
    #[arg(long)]
    street: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    province: String,
    #[arg(long)]
    post_code: String,
    #[arg(long)]
    country: String,
    #[arg(long, default_value_t = 0)]
    parking_spaces: i32,
    #[arg(long, default_value_t = 0)]
    number_of_bathrooms: i32,
    #[arg(long, default_value_t = 0)]
    number_of_bedrooms: i32,
}

impl PropertyArgs {
    fn into_new_property(self) -> Result<NewProperty> {
        if !self.price.is_finite() || self.price < 0.0 {
            bail!("price must be a non-negative number of dollars, got {}", self.price);
        }
        Ok(NewProperty {
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            thumbnail_photo_url: self.thumbnail_photo_url,
            cover_photo_url: self.cover_photo_url,
            cost_per_night: dollars_to_cents(self.price),
            street: self.street,
            city: self.city,
            province: self.province,
            post_code: self.post_code,
            country: self.country,
            parking_spaces: self.parking_spaces,
            number_of_bathrooms: self.number_of_bathrooms,
            number_of_bedrooms: self.number_of_bedrooms,
        })
    }
}

/// Parse a price flag, rejecting NaN and infinities before they reach the
/// cents conversion.
fn parse_dollars(raw: &str) -> Result<f64, String> {
    let dollars: f64 = raw
        .parse()
        .map_err(|_| format!("'{raw}' is not a number of dollars"))?;
    if !dollars.is_finite() {
        return Err(format!("'{raw}' is not a finite number of dollars"));
    }
    Ok(dollars)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect(database_url: Option<String>) -> Result<PgStore> {
    let mut config = DbConfig::from_env()?;
    if let Some(url) = database_url {
        config = config.with_url(url);
    }
    let pool = db::pool::create_pool(&config)
        .await
        .context("failed to connect to database")?;
    Ok(PgStore::new(pool))
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Migrate = cli.command {
        if cli.fixtures.is_some() {
            bail!("migrate needs a database; drop --fixtures");
        }
        let pg = connect(cli.database_url).await?;
        db::pool::run_migrations(pg.pool())
            .await
            .context("migration failed")?;
        info!("Migrations applied successfully");
        pg.close().await;
        return Ok(());
    }

    let (store, pg): (Arc<dyn RentalStore>, Option<PgStore>) = match &cli.fixtures {
        Some(dir) => {
            info!("Using in-memory store seeded from {}", dir.display());
            let memory = MemoryStore::from_fixture_dir(dir)
                .await
                .with_context(|| format!("cannot load fixtures from {}", dir.display()))?;
            let store: Arc<dyn RentalStore> = Arc::new(memory);
            (store, None)
        }
        None => {
            let pg = connect(cli.database_url).await?;
            let store: Arc<dyn RentalStore> = Arc::new(pg.clone());
            (store, Some(pg))
        }
    };
    let gateway = QueryGateway::new(store);

    let outcome = dispatch(&gateway, cli.command).await;

    if let Some(pg) = pg {
        pg.close().await;
    }
    outcome
}

async fn dispatch(gateway: &QueryGateway, command: Command) -> Result<()> {
    match command {
        Command::Migrate => bail!("migrate runs before a gateway is built"),
        Command::User { email, id } => {
            let user = match (email, id) {
                (Some(email), _) => gateway.get_user_by_email(&email).await?,
                (None, Some(id)) => gateway.get_user_by_id(id).await?,
                (None, None) => bail!("pass --email or --id"),
            };
            print_json(&user)
        }
        Command::AddUser { name, email, password } => {
            let user = gateway
                .create_user(&NewUser { name, email, password })
                .await?;
            print_json(&user)
        }
        Command::Reservations { guest_id, limit } => {
            let rows = gateway.list_past_reservations_for_guest(guest_id, limit).await?;
            print_json(&rows)
        }
        Command::Properties {
            city,
            owner_id,
            minimum_rating,
            minimum_price,
            maximum_price,
            limit,
        } => {
            let filter = PropertyFilter {
                city,
                owner_id,
                minimum_rating,
                minimum_price_per_night: minimum_price,
                maximum_price_per_night: maximum_price,
            };
            let rows = gateway.list_properties(&filter, limit).await?;
            print_json(&rows)
        }
        Command::AddProperty(args) => {
            let property = gateway.create_property(&args.into_new_property()?).await?;
            print_json(&property)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}
