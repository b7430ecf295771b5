use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use intern_scout::api::{ApiClient, PositionQuery};
use intern_scout::config::AppConfig;
use intern_scout::dates::format_hu_date;
use intern_scout::filters::{self, DeadlineFilter, FilterOptions, FilterState, Selection, SortKey};
use intern_scout::geo::{
    distance_km, nearest, BatchGeocoder, FileCache, Geocoder, PhotonGeocoder,
};
use intern_scout::models::{Coordinate, Position};

#[derive(Parser)]
#[command(name = "intern-scout", version, about = "Browse and map internship positions")]
struct Cli {
    /// Config file (defaults to ./intern-scout.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch positions, filter, sort and print one page
    Positions {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 20)]
        per_page: usize,
        /// Also write the filtered list as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the distinct cities, companies and tags of all positions
    Options,
    /// Resolve an address to coordinates
    Geocode {
        city: String,
        #[arg(default_value = "")]
        address: String,
    },
    /// Haversine distance in km
    Distance {
        lat1: f64,
        lng1: f64,
        lat2: f64,
        lng2: f64,
    },
    /// Geocode the filtered positions for the map view
    Map {
        #[command(flatten)]
        filter: FilterArgs,
        /// Origin as `lat,lng`; lists positions by distance
        #[arg(long, value_parser = parse_coordinate)]
        near: Option<Coordinate>,
        #[arg(long, requires = "near")]
        radius: Option<f64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value = "ALL")]
    city: String,
    #[arg(long, default_value = "ALL")]
    company: String,
    #[arg(long, default_value = "ALL")]
    category: String,
    /// Repeatable; every tag must be present
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// ALL, 7D, 30D, 90D or NO_DEADLINE
    #[arg(long, default_value = "ALL")]
    deadline: DeadlineFilter,
    #[arg(long)]
    active_only: bool,
    /// NEWEST, DEADLINE_ASC, DEADLINE_DESC or TITLE_ASC
    #[arg(long, default_value = "NEWEST")]
    sort: SortKey,
}

impl From<FilterArgs> for FilterState {
    fn from(args: FilterArgs) -> Self {
        Self {
            search: args.search,
            city: Selection::parse(&args.city),
            company: Selection::parse(&args.company),
            tag_category: Selection::parse(&args.category),
            deadline: args.deadline,
            active_only: args.active_only,
            selected_tags: args.tags.into_iter().collect(),
            sort: args.sort,
        }
    }
}

fn parse_coordinate(raw: &str) -> Result<Coordinate, String> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected `lat,lng`, got {raw:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lng: f64 = lng.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    Ok(Coordinate::new(lat, lng))
}

fn api_client(config: &AppConfig) -> Result<ApiClient> {
    let client = ApiClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )?;
    Ok(match &config.api.token {
        Some(token) => client.with_token(token.clone()),
        None => client,
    })
}

fn geocoder(config: &AppConfig) -> Result<Geocoder> {
    let settings = &config.geocoding;
    let cache = FileCache::open(&settings.cache_path).with_context(|| {
        format!("Failed to open geocoding cache {}", settings.cache_path.display())
    })?;
    let provider = PhotonGeocoder::new(
        settings.base_url.clone(),
        &settings.user_agent,
        Duration::from_secs(settings.timeout_secs),
    )?;

    Ok(Geocoder::new(Arc::new(cache), Arc::new(provider))
        .with_policy(settings.cache_policy())
        .with_request_delay(settings.request_delay()))
}

async fn fetch_filtered(config: &AppConfig, state: &FilterState) -> Result<Vec<Position>> {
    let positions = api_client(config)?
        .list_positions(&PositionQuery::default())
        .await
        .context("Failed to load positions")?;
    info!("Loaded {} positions from {}", positions.len(), config.api.base_url);
    Ok(filters::apply(&positions, state, Utc::now()))
}

fn print_position(index: usize, position: &Position) {
    println!("{}. {} ({})", index, position.title, position.company_name());
    println!("   {} {}", position.location.city, position.address());
    println!("   Deadline: {}", format_hu_date(position.deadline.as_deref()));
    if !position.tags.is_empty() {
        let tags: Vec<&str> = position.tags.iter().map(|t| t.name.as_str()).collect();
        println!("   Tags: {}", tags.join(", "));
    }
    println!("   ID: {}", position.id);
    println!();
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("💾 Saved {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Positions {
            filter,
            page,
            per_page,
            output,
        } => {
            let state = FilterState::from(filter);
            let visible = fetch_filtered(&config, &state).await?;
            let page = filters::paginate(&visible, page, per_page);

            info!(
                "Page {}/{} ({} matching positions)",
                page.page,
                page.total_pages.max(1),
                page.total
            );
            let offset = page.offset();
            for (i, position) in page.items.iter().enumerate() {
                print_position(offset.saturating_add(i + 1), position);
            }

            if let Some(path) = output {
                write_json(&path, &visible).await?;
            }
        }

        Command::Options => {
            let positions = fetch_filtered(&config, &FilterState::default()).await?;
            let options = FilterOptions::from_positions(&positions);
            println!("{}", serde_json::to_string_pretty(&options)?);
        }

        Command::Geocode { city, address } => {
            let geocoder = geocoder(&config)?;
            match geocoder.resolve(&city, &address).await {
                Some(resolved) => println!(
                    "{:.5}, {:.5} (via {:?})",
                    resolved.coordinate.lat, resolved.coordinate.lng, resolved.source
                ),
                None => warn!("No coordinates found for {:?} {:?}", city, address),
            }
        }

        Command::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            let km = distance_km(Coordinate::new(lat1, lng1), Coordinate::new(lat2, lng2));
            println!("{km:.2} km");
        }

        Command::Map {
            filter,
            near,
            radius,
            output,
        } => {
            let state = FilterState::from(filter);
            let visible = fetch_filtered(&config, &state).await?;
            let batch = BatchGeocoder::new(Arc::new(geocoder(&config)?));

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, stopping after the current lookup");
                    on_interrupt.cancel();
                }
            });

            let outcome = batch.run(&visible, &cancel).await;
            let coordinates = outcome.coordinates();

            match near {
                Some(origin) => {
                    for (i, hit) in nearest(&visible, &coordinates, origin, radius).iter().enumerate() {
                        println!(
                            "{}. {} ({}) - {:.1} km",
                            i + 1,
                            hit.position.title,
                            hit.position.location.city,
                            hit.distance_km
                        );
                    }
                }
                None => {
                    for (id, coordinate) in &outcome.located {
                        println!("{id}: {:.5}, {:.5}", coordinate.lat, coordinate.lng);
                    }
                }
            }

            if let Some(path) = output {
                write_json(&path, &coordinates).await?;
            }
        }
    }

    Ok(())
}
