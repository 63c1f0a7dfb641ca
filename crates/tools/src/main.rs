use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use layers::LayerKind;
use layers::raster::BaseMap;
use scene::{Action, AreaData, ViewState, ViewerConfig, render_plan};
use streaming::AreaDataLoader;
use tools::{DataRoot, apply_overrides, detail_text, render_summary, select, status_table};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Protected-areas map viewer (terminal front end)")]
struct Args {
    /// Directory or http(s) base URL holding the `data/*.geojson` layer files
    #[arg(long, env = "AREAS_DATA_ROOT", default_value = "crates/apps/viewer_web/assets")]
    data_root: DataRoot,

    /// Viewer configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exact set of visible layers (overrides the configured defaults)
    #[arg(long = "show", value_delimiter = ',')]
    show: Vec<LayerKind>,

    /// Base map id (hot, osm, esriSat, esriTopo, cartoLight, cartoDark)
    #[arg(long)]
    base_map: Option<BaseMap>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load every layer and report visibility and load state
    Status,
    /// Print the draw list for the visible, loaded layers
    Render,
    /// Select one feature and print its detail panel
    Details {
        /// Layer id
        layer: LayerKind,
        /// Zero-based feature index within the layer
        index: usize,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<(), String> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::from_path(path).map_err(|e| e.to_string())?,
        None => ViewerConfig::default(),
    };

    let data = Arc::new(AreaData::new());
    let loader = AreaDataLoader::new(args.data_root.source(), Arc::clone(&data));
    let results = loader.load_all(|_| {}).await;
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!("{} of {} layers loaded", results.len() - failed, results.len());

    let state = apply_overrides(ViewState::new(&config), &args.show, args.base_map, &data)
        .map_err(|e| e.to_string())?;

    match args.command {
        Command::Status => {
            if args.json {
                let rows: Vec<serde_json::Value> = LayerKind::ALL
                    .into_iter()
                    .map(|layer| {
                        serde_json::json!({
                            "id": layer.id(),
                            "label": layer.label(),
                            "visible": state.is_visible(layer),
                            "features": data.collection(layer).map(|c| c.len()),
                        })
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                print!("{}", status_table(&state, &data));
            }
        }
        Command::Render => {
            let plan = render_plan(&state, &data);
            if args.json {
                print_json(&plan)?;
            } else {
                print!("{}", render_summary(&plan));
            }
        }
        Command::Details { layer, index } => {
            // Details imply the layer is on; selection still rejects unloaded layers.
            let state = if state.is_visible(layer) {
                state
            } else {
                state
                    .apply(Action::ToggleLayer(layer), &data)
                    .map_err(|e| e.to_string())?
            };
            let state = select(state, layer, index, &data).map_err(|e| e.to_string())?;
            let panel = state.detail_panel(&data);
            if args.json {
                print_json(&panel)?;
            } else {
                print!("{}", detail_text(&panel));
            }
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}
