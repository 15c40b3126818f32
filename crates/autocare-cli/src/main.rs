mod centers;
mod reminders;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "autocare-cli")]
#[command(about = "Autocare service-center and reminder tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Service reminder batch
    Reminders {
        #[command(subcommand)]
        command: ReminderCommands,
    },
    /// Service-center search
    Centers {
        #[command(subcommand)]
        command: CenterCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check the database connection
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Subcommand)]
enum ReminderCommands {
    /// Process due reminders once
    Run {
        /// Reference date (YYYY-MM-DD); defaults to today at the configured offset
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Render messages without sending or marking reminders
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Subcommand)]
enum CenterCommands {
    /// Registered and nearby service centers around a point
    Nearby {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Free-text query, e.g. "brake repair"
        #[arg(long)]
        query: Option<String>,
        /// Only show registered centers
        #[arg(long)]
        registered_only: bool,
        /// Search radius in meters; defaults to the configured radius
        #[arg(long)]
        radius: Option<u32>,
        /// Result cap; defaults to the configured maximum
        #[arg(long)]
        max_results: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("autocare-cli: no command given; run with --help for usage");
        return Ok(());
    };

    let config = autocare_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = autocare_db::PoolConfig::from_app_config(&config);
    let pool = autocare_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                autocare_db::health_check(&pool).await?;
                println!("database ok");
            }
            DbCommands::Migrate => {
                let applied = autocare_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
            }
        },
        Commands::Reminders {
            command: ReminderCommands::Run { date, dry_run },
        } => {
            let reference = date.unwrap_or_else(|| config.local_today());
            reminders::run_reminders(pool, &config, reference, dry_run).await?;
        }
        Commands::Centers { command } => {
            let query = nearby_query(
                command,
                config.places_default_radius_m,
                config.places_max_results,
            );
            centers::run_nearby(pool, &config, &query).await?;
        }
    }

    Ok(())
}

/// Fills unset flags from configuration and clamps them to what the
/// provider accepts.
fn nearby_query(
    command: CenterCommands,
    default_radius_m: u32,
    default_max_results: usize,
) -> autocare_core::NearbyQuery {
    let CenterCommands::Nearby {
        lat,
        lng,
        query,
        registered_only,
        radius,
        max_results,
    } = command;
    autocare_core::NearbyQuery {
        origin: autocare_core::Coordinates::new(lat, lng),
        search_query: query,
        filter_registered: registered_only,
        radius_m: radius.unwrap_or(default_radius_m),
        max_results: max_results.unwrap_or(default_max_results),
    }
    .clamped()
}

#[cfg(test)]
mod tests;
