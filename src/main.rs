use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use review_map::application::services::{MapViewController, SubmitOutcome};
use review_map::domain::entities::ViewportState;
use review_map::domain::value_objects::Coordinates;
use review_map::presentation::dto::{EntryView, ImageUpload};
use review_map::{init_logging, AppConfig, AppState};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "review-map")]
#[command(about = "Clustered purchase review map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Launch URL; `?admin=true` unlocks the admin commands
    #[arg(long, env = "REVIEW_MAP_URL")]
    url: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print all entries
    List {
        /// Print as JSON instead of one line per entry
        #[arg(long)]
        json: bool,
    },
    /// Geocode a pincode and add a review entry
    Add {
        #[arg(long)]
        pincode: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        product_name: String,
        #[arg(long, default_value = "")]
        product_link: String,
        #[arg(long, default_value = "")]
        review: String,
        #[arg(long, default_value_t = 5)]
        rating: u8,
        /// Image file embedded as a data URI
        #[arg(long, conflicts_with = "image_url")]
        image: Option<PathBuf>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Remove all custom entries and restore the built-in ones
    Reset {
        /// Confirm clearing all custom entries
        #[arg(long)]
        yes: bool,
    },
    /// Write the rendered map as GeoJSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change the persisted viewport
    Viewport {
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        #[arg(long)]
        zoom: Option<u8>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.json_logs)?;

    info!("Starting review-map v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    let state = AppState::new(config, cli.url.as_deref())?;

    match cli.command {
        Commands::List { json } => list_entries(&state, json).await?,
        Commands::Add {
            pincode,
            name,
            product_name,
            product_link,
            review,
            rating,
            image,
            image_url,
        } => {
            let user_image = match image {
                Some(path) => Some(ImageUpload::from_path(&path)?.to_data_uri()),
                None => image_url,
            };
            if !state.open_admin_panel().await {
                bail!("Admin access required, pass --url with ?admin=true");
            }
            {
                let mut panel = state.admin_panel.lock().await;
                let form = panel.form_mut();
                form.pincode = pincode;
                form.name = name;
                form.product_name = product_name;
                form.product_link = product_link;
                form.review = review;
                form.rating = rating;
                form.user_image = user_image;
            }
            add_entry(&state).await?;
        }
        Commands::Reset { yes } => {
            if !state.admin_access.lock().await.is_authorized() {
                bail!("Admin access required, pass --url with ?admin=true");
            }
            match state.reset_entries(yes).await? {
                Some(entries) => println!("Reset to {} built-in entries", entries.len()),
                None => println!("Nothing cleared, re-run with --yes to confirm"),
            }
        }
        Commands::Export { output } => {
            let geojson = serde_json::to_string_pretty(&state.map_scene.to_geojson())?;
            match output {
                Some(path) => {
                    std::fs::write(&path, geojson)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Exported map to {}", path.display());
                }
                None => println!("{geojson}"),
            }
        }
        Commands::Viewport { lat, lng, zoom } => {
            let mut map = state.map_view.lock().await;
            if lat.is_some() || zoom.is_some() {
                change_viewport(&mut map, lat.zip(lng), zoom)?;
            }
            println!("{}", serde_json::to_string_pretty(&map.restored_viewport())?);
        }
    }

    Ok(())
}

async fn list_entries(state: &AppState, json: bool) -> Result<()> {
    let entries = state.entries().await;
    let views: Vec<EntryView> = entries.iter().map(EntryView::from).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }
    for view in views {
        println!(
            "{:<16} {:<20} [{:.4}, {:.4}] {} {}",
            view.id,
            view.name,
            view.coords[0],
            view.coords[1],
            view.rating,
            view.product_name.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

async fn add_entry(state: &AppState) -> Result<()> {
    match state.submit().await {
        Ok(SubmitOutcome::Added { entry, entries }) => {
            println!(
                "Added {} at {} ({} entries)",
                entry.id(),
                entry.coordinates(),
                entries.len()
            );
            Ok(())
        }
        Ok(SubmitOutcome::Skipped) => bail!("Pincode is required"),
        Ok(other) => {
            warn!("Submit did not complete: {other:?}");
            bail!("Submit did not complete")
        }
        Err(err) => {
            warn!("Submit failed: {err}");
            bail!("{}", err.user_message())
        }
    }
}

fn change_viewport(
    map: &mut MapViewController,
    center: Option<(f64, f64)>,
    zoom: Option<u8>,
) -> Result<()> {
    let current = map.restored_viewport();
    let center = match center {
        Some((lat, lng)) => Coordinates::new(lat, lng).map_err(anyhow::Error::msg)?,
        None => current.center,
    };
    map.set_view(ViewportState::new(center, zoom.unwrap_or(current.zoom)))?;
    Ok(())
}
