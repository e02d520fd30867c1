//! Shoppingcart
//!
//! Connects to MongoDB once and runs product operations one after another.
//! Exits non-zero when a propagating step fails.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_products::{MongoProductRepository, ProductService};
use eyre::Result;
use tracing::{info, warn};

mod config;
mod operations;
mod samples;

use config::Config;

#[derive(Parser)]
#[command(name = "shoppingcart")]
#[command(about = "Create, find, update and delete products in MongoDB")]
struct Cli {
    /// MongoDB connection URI (overrides MONGODB_URL)
    #[arg(long, global = true)]
    uri: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum Commands {
    /// Insert the sample product and update its rate (default)
    Create,

    /// List products with the given name
    Find {
        #[arg(short, long, default_value = samples::KEYBOARD)]
        name: String,
    },

    /// Set the rate of the first product with the given name
    Update {
        #[arg(short, long, default_value = samples::KEYBOARD)]
        name: String,

        #[arg(short, long, default_value_t = 99.0)]
        rate: f64,
    },

    /// Delete the first product with the given name
    Delete {
        #[arg(short, long, default_value = samples::KEYBOARD)]
        name: String,
    },

    /// Insert, update, find and delete a keyboard, failing on any error
    Scenario,
}

impl Commands {
    /// Whether a failure in this command ends the run with a non-zero exit
    fn propagates_errors(&self) -> bool {
        matches!(self, Commands::Create | Commands::Scenario)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let config = Config::load(cli.uri.as_deref())?;
    init_tracing(&config.environment);

    let command = cli.command.unwrap_or(Commands::Create);

    let connection = match database::mongodb::connect(&config.mongodb).await {
        Ok(connection) => connection,
        Err(e) if e.is_connection_failure() && !command.propagates_errors() => {
            warn!(?command, "Skipping command, MongoDB is unreachable");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let service = ProductService::new(MongoProductRepository::from_connection(&connection));

    let mut out = std::io::stdout();

    match command {
        Commands::Create => {
            operations::create_product(&service, &mut out).await?;
            println!("Operations completed successfully");
        }
        Commands::Find { name } => {
            let outcome = operations::find_products(&service, &name, &mut out).await?;
            info!(?outcome, "find finished");
        }
        Commands::Update { name, rate } => {
            let outcome = operations::update_product(&service, &name, rate, &mut out).await?;
            info!(?outcome, "update finished");
        }
        Commands::Delete { name } => {
            let outcome = operations::delete_product(&service, &name, &mut out).await?;
            info!(?outcome, "delete finished");
        }
        Commands::Scenario => {
            operations::run_scenario(&service, &mut out).await?;
            println!("Operations completed successfully");
        }
    }

    Ok(())
}
