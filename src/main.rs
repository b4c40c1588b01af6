use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use buildcost::calculator::{CostCalculator, RateCard};
use buildcost::client::{EstimatorClient, DEFAULT_URL};
use buildcost::config::{ServerConfig, StorageConfig};
use buildcost::models::{CalculateCostInput, CreateProjectInput};
use buildcost::service::ProjectService;
use buildcost::store::{MemoryStore, ProjectStore};
use buildcost::validation::validate_calculation;
use buildcost::{api, db, format};

#[derive(Parser)]
#[command(name = "buildcost")]
#[command(about = "Building construction cost estimator")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Estimate a building locally without saving it
    Estimate {
        /// Floor area per floor in square feet (up to two decimal places)
        #[arg(long)]
        area: f64,

        /// Number of floors
        #[arg(long)]
        floors: u32,

        /// Material grade (Standard, Premium, Luxury)
        #[arg(long, default_value = "Standard")]
        material: String,

        /// Additional feature, repeatable (e.g. --feature Parking --feature "Solar Panels")
        #[arg(long = "feature")]
        features: Vec<String>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the material and feature rate card
    Rates,
    /// Work with projects saved on a running server
    Projects {
        /// Base URL of the server API
        #[arg(long, env = "BUILDCOST_URL", default_value = DEFAULT_URL)]
        url: String,

        #[command(subcommand)]
        command: ProjectCommands,
    },
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port for HTTP API
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, conflicts_with = "in_memory")]
    database: Option<PathBuf>,

    /// Keep projects in memory only
    #[arg(long)]
    in_memory: bool,
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List saved projects, newest first
    List,
    /// Show one project with its cost breakdown
    Show { id: Uuid },
    /// Save a new project
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: String,

        #[arg(long)]
        area: f64,

        #[arg(long)]
        floors: u32,

        #[arg(long, default_value = "Standard")]
        material: String,

        #[arg(long = "feature")]
        features: Vec<String>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "buildcost=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn open_store(storage: &StorageConfig) -> anyhow::Result<Arc<dyn ProjectStore>> {
    let store: Arc<dyn ProjectStore> = match storage {
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory storage; projects will not survive a restart");
            Arc::new(MemoryStore::new())
        }
        StorageConfig::File(path) => {
            let db = db::Database::open(path.clone())?;
            db.migrate()?;
            tracing::info!("Using database at {}", path.display());
            Arc::new(db)
        }
        StorageConfig::Default => {
            let db = db::Database::open_default()?;
            db.migrate()?;
            Arc::new(db)
        }
    };
    Ok(store)
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env();
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.in_memory {
        config.storage = StorageConfig::Memory;
    } else if let Some(path) = args.database {
        config.storage = StorageConfig::File(path);
    }

    let store = open_store(&config.storage)?;
    let service = ProjectService::new(store, CostCalculator::default());
    let app = api::create_router_with_config(service, &config);

    let addr = config.bind_address()?;
    tracing::info!("Starting buildcost server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("buildcost server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_projects(client: EstimatorClient, command: ProjectCommands) -> anyhow::Result<()> {
    match command {
        ProjectCommands::List => {
            let projects = client.list_projects().await?;
            print!("{}", format::render_project_list(&projects));
        }
        ProjectCommands::Show { id } => {
            let project = client.get_project(id).await?;
            print!("{}", format::render_project(&project));
        }
        ProjectCommands::Create {
            name,
            location,
            area,
            floors,
            material,
            features,
        } => {
            let input = CreateProjectInput::new(name, location, area, floors, material, features);
            let project = client.create_project(&input).await?;
            print!("{}", format::render_project(&project));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args).await?,
        Some(Commands::Estimate {
            area,
            floors,
            material,
            features,
            json,
        }) => {
            let query = validate_calculation(&CalculateCostInput {
                floor_area: Some(area),
                number_of_floors: Some(f64::from(floors)),
                material_type: Some(material),
                additional_features: Some(features),
            })?;
            let breakdown = CostCalculator::default().calculate(
                query.floor_area,
                query.number_of_floors,
                &query.material_type,
                query.additional_features.as_slice(),
            )?;
            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print!(
                    "{}",
                    format::render_breakdown(query.floor_area, query.number_of_floors, &breakdown)
                );
            }
        }
        Some(Commands::Rates) => {
            print!("{}", format::render_rate_card(&RateCard::standard()));
        }
        Some(Commands::Projects { url, command }) => {
            run_projects(EstimatorClient::new(url), command).await?;
        }
        None => serve(ServeArgs::default()).await?,
    }

    Ok(())
}
