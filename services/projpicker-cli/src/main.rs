//! ProjPicker command-line front end.
//!
//! Drives one widget session against a CRS search server:
//! - `query`: send drawn geometry, list the matching CRSs, optionally select one
//! - `encode`: print the request body without sending it
//! - `bbox`: print the highlight rings for an ad-hoc bounding box

mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use projpicker_common::{CrsBbox, CrsId};
use projpicker_protocol::{
    serialize, FeatureCollection, LogicalOperator, ResponseShape, SerializationMode,
};
use projpicker_widget::{
    BboxRenderer, FeatureChange, MemoryMap, PickerSession, RecordingView, WidgetConfig,
};

use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "projpicker")]
#[command(about = "Find coordinate reference systems covering drawn geometry")]
struct Cli {
    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send geometry to the search server and list matching CRSs
    Query {
        /// GeoJSON FeatureCollection with the drawn geometry (empty query if omitted)
        #[arg(short, long)]
        features: Option<PathBuf>,

        /// Search server base URL
        #[arg(long, env = "PROJPICKER_ENDPOINT", default_value = "http://localhost:8000")]
        endpoint: String,

        /// Widget config YAML; its endpoint replaces --endpoint
        #[arg(short, long, env = "PROJPICKER_CONFIG")]
        config: Option<PathBuf>,

        /// Logical operator: and, or, xor
        #[arg(long)]
        operator: Option<LogicalOperator>,

        /// Request body format: structured or line-protocol
        #[arg(long)]
        mode: Option<SerializationMode>,

        /// CRS to select after listing, e.g. EPSG:4326
        #[arg(short, long)]
        select: Option<CrsId>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,
    },

    /// Print the request body for some geometry without sending it
    Encode {
        /// GeoJSON FeatureCollection with the drawn geometry (empty query if omitted)
        #[arg(short, long)]
        features: Option<PathBuf>,

        /// Logical operator: and, or, xor
        #[arg(long, default_value = "and")]
        operator: LogicalOperator,

        /// Request body format: structured or line-protocol
        #[arg(long, default_value = "structured")]
        mode: SerializationMode,
    },

    /// Print the highlight rings for a bounding box
    Bbox {
        /// Bounding box as south,north,west,east in degrees
        #[arg(allow_hyphen_values = true)]
        bbox: String,

        /// Print GeoJSON instead of ring vertices
        #[arg(long)]
        geojson: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::Query {
            features,
            endpoint,
            config,
            operator,
            mode,
            select,
            output,
        } => {
            let mut config = match config {
                Some(path) => WidgetConfig::from_file(&path)?,
                None => WidgetConfig::new(endpoint),
            };
            if let Some(operator) = operator {
                config.operator = operator;
            }
            if let Some(mode) = mode {
                config.mode = mode;
            }
            let config = config.with_env_view()?;
            config.validate()?;

            let view = config.initial_view;
            debug!(lat = view.lat, lon = view.lon, zoom = view.zoom, "Initial map view");
            info!(
                endpoint = %config.endpoint,
                mode = %config.mode,
                operator = %config.operator,
                "Querying CRS search server"
            );

            run_query(&config, features.as_deref(), select.as_ref(), output).await
        }
        Commands::Encode {
            features,
            operator,
            mode,
        } => {
            let collection = load_features(features.as_deref())?;
            let query = serialize(&collection, operator, mode);
            print!("{}", query.to_body_string()?);
            if mode == SerializationMode::Structured {
                println!();
            }
            Ok(())
        }
        Commands::Bbox { bbox, geojson } => {
            let bbox = CrsBbox::parse(&bbox).context("invalid bounding box")?;
            let rings = bbox.rings();
            if geojson {
                let mut renderer = BboxRenderer::new(MemoryMap::default());
                renderer.render(&rings);
                let layer = renderer.layer().to_geojson().unwrap_or_default();
                println!("{}", serde_json::to_string_pretty(&layer)?);
            } else {
                println!("{}", output::format_rings(&rings));
                if bbox.crosses_antimeridian() {
                    println!("(split at the antimeridian)");
                }
            }
            Ok(())
        }
    }
}

async fn run_query(
    config: &WidgetConfig,
    features: Option<&Path>,
    select: Option<&CrsId>,
    output: OutputFormat,
) -> Result<()> {
    let mut session = PickerSession::new(
        config.build_widget(),
        config.build_dispatcher()?,
        MemoryMap::default(),
        RecordingView::default(),
    );

    match features {
        Some(path) => {
            let collection = load_features(Some(path))?;
            session
                .feature_changed(FeatureChange::Replaced(collection))
                .await?;
        }
        None => session.refresh().await,
    }

    if let Some((kind, message)) = session.view().failures.last() {
        bail!("{}: {}", kind, message);
    }

    let shape = session.widget().store().shape();
    if shape == Some(ResponseShape::Array) {
        info!("Server answered with the legacy array response");
    }

    if let Some(id) = select {
        session.select(id).await?;
    }

    let view = session.view();
    let highlight = session.renderer().layer().to_geojson();
    match output {
        OutputFormat::Json => {
            let selected = view.details.as_ref().map(|d| (d, highlight));
            let report = output::query_report(&view.list, shape, selected);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!("{}", output::format_list(&view.list));
            if let Some(details) = &view.details {
                println!();
                println!("{}", output::format_details(details));
                if let Some(highlight) = highlight {
                    println!();
                    println!("{}", highlight);
                }
            }
        }
    }
    Ok(())
}

/// Read a FeatureCollection file, or an empty collection when no file is given.
fn load_features(path: Option<&Path>) -> Result<FeatureCollection> {
    let Some(path) = path else {
        return Ok(FeatureCollection::new());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a GeoJSON FeatureCollection", path.display()))
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
