use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rumour_map::infra::import::csv::read_positions_csv;
use rumour_map::infra::import::xlsx::read_positions_xlsx;
use rumour_map::infra::sheets::client::SheetsClient;
use rumour_map::settings::Settings;
use rumour_map::{LoadService, MarkerId, PushError, PushOutcome, SyncService};

#[derive(Parser)]
#[command(
    name = "rumour-map",
    about = "Sync rumour map markers with their backing spreadsheet"
)]
struct Cli {
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the markers currently on the sheet
    Pull,
    /// Move one marker and push the change
    Move {
        #[arg(long)]
        id: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Append a new marker row to the sheet
    Add {
        #[arg(long)]
        label: String,
        #[arg(long)]
        x: f64,
        #[arg(long)]
        y: f64,
    },
    /// Reconcile an offline sheet export against the live sheet
    Sync {
        #[arg(long, value_name = "PATH", conflicts_with = "xlsx")]
        csv: Option<PathBuf>,
        #[arg(long, value_name = "PATH")]
        xlsx: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let layout = settings.column_layout()?;
    let token = Settings::access_token()?;
    let client = Arc::new(SheetsClient::new(&settings, layout, token)?);
    let loader = LoadService::new(client.clone(), layout);
    let sync = SyncService::new(client);

    match cli.command {
        Command::Pull => {
            let report = loader.load_markers().await?;
            if !report.skipped_rows.is_empty() {
                info!(skipped = report.skipped_rows.len(), "some rows were skipped");
            }
            for marker in &report.markers {
                println!(
                    "{}\trow {}\t({}, {})\t{}",
                    marker.id, marker.sheet_row, marker.x, marker.y, marker.label
                );
            }
            println!("{} markers", report.markers.len());
            Ok(())
        }
        Command::Move { id, x, y } => {
            let mut report = loader.load_markers().await?;
            let target = MarkerId::new(id);
            let marker = report
                .markers
                .iter_mut()
                .find(|marker| marker.id == target)
                .ok_or_else(|| anyhow!("no marker with id {target}"))?;
            sync.record_move(marker, x, y);
            report_push(sync.push(&mut report.markers).await)
        }
        Command::Add { label, x, y } => {
            let marker = sync.add_marker(&label, x, y).await?;
            println!("added {} at row {}", marker.id, marker.sheet_row);
            Ok(())
        }
        Command::Sync { csv, xlsx } => {
            let positions = match (csv, xlsx) {
                (Some(path), None) => read_positions_csv(&path, &layout, settings.first_data_row)?,
                (None, Some(path)) => read_positions_xlsx(
                    &path,
                    &settings.sheet_name,
                    &layout,
                    settings.first_data_row,
                )?,
                _ => return Err(anyhow!("pass exactly one of --csv or --xlsx")),
            };

            let mut report = loader.load_markers().await?;
            let mut moved = 0usize;
            for position in &positions {
                if let Some(marker) = report
                    .markers
                    .iter_mut()
                    .find(|marker| marker.id == position.id)
                {
                    if marker.x != position.x || marker.y != position.y {
                        sync.record_move(marker, position.x, position.y);
                        moved += 1;
                    }
                }
            }
            info!(snapshot = positions.len(), moved, "reconciled offline snapshot");
            report_push(sync.push(&mut report.markers).await)
        }
    }
}

fn report_push(result: Result<PushOutcome, PushError>) -> Result<()> {
    match result {
        Ok(PushOutcome::NoChanges) => {
            println!("nothing to push");
            Ok(())
        }
        Ok(PushOutcome::Updated { updated_cells }) => {
            println!("updated {updated_cells} cells");
            Ok(())
        }
        Err(PushError::InFlight) => Err(anyhow!("a push is already in progress")),
        Err(PushError::Sheet(err)) => Err(anyhow!("{err}; {}", err.user_guidance())),
    }
}
