mod backends;
mod json;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use waypoints_core::config::{default_config_path, default_translations_dir};
use waypoints_core::display::{
    BeaconDisplay, DisplayEngine, EngineConfig, ParticleDisplay, ViewerId, WaypointDisplay,
    spawn_scheduler,
};
use waypoints_core::translation::TranslationTable;
use waypoints_core::waypoint::{LoadFailure, read_waypoint};
use waypoints_core::{
    ConfigResolver, Location, WaypointList, WaypointsConfig, WaypointsConfigExt,
    waypoint_icon,
};
use waypoints_types::DisplayKind;
use waypoints_types::formatting::format_coordinate;

use backends::{FixedViewer, LoggingBeacons, LoggingParticles};

#[derive(Parser)]
#[command(version, about = "Waypoint data and display tooling")]
struct Cli {
    /// Config file (defaults to the platform config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shipped default configuration
    DefaultConfig,
    /// Validate the configuration and print per-category defaults
    CheckConfig,
    /// Load a JSON waypoint file and print resolved attributes
    Inspect {
        path: PathBuf,
        /// Translation table (TOML)
        #[arg(short, long)]
        translations: Option<PathBuf>,
        /// Write the loaded waypoints back out as normalized JSON
        #[arg(short, long)]
        write: Option<PathBuf>,
    },
    /// Show every waypoint to one simulated viewer and run the scheduler
    Simulate {
        path: PathBuf,
        #[arg(long, default_value_t = 5)]
        ticks: u32,
        /// Overrides `display.kind` from the config
        #[arg(long, value_enum)]
        display: Option<DisplayArg>,
        /// World the viewer stands in, at 0 64 0
        #[arg(long, default_value = "world")]
        world: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DisplayArg {
    Beacon,
    Particle,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If WAYPOINTS_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("WAYPOINTS_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::DefaultConfig => {
            let text = toml::to_string_pretty(&WaypointsConfig::default())
                .map_err(|e| e.to_string())?;
            println!("{text}");
        }
        Commands::CheckConfig => {
            match cli.config.clone().or_else(default_config_path) {
                Some(path) => println!("Config: {}", path.display()),
                None => println!("Config: platform config dir unavailable"),
            }
            let resolver = load_resolver(cli.config.as_deref())?;
            print_defaults(&resolver);
        }
        Commands::Inspect {
            path,
            translations,
            write,
        } => {
            let resolver = load_resolver(cli.config.as_deref())?;
            let translations = load_translations(translations.as_deref())?;
            let list = load_waypoints(&path)?;
            inspect(&list, &resolver, &translations);
            if let Some(out) = write {
                let value = json::from_tag(&list.to_list_tag());
                let text = serde_json::to_string_pretty(&value).map_err(|e| e.to_string())?;
                std::fs::write(&out, text).map_err(|e| format!("{}: {e}", out.display()))?;
                println!("Wrote {} waypoints to {}", list.len(), out.display());
            }
        }
        Commands::Simulate {
            path,
            ticks,
            display,
            world,
        } => {
            let resolver = Arc::new(load_resolver(cli.config.as_deref())?);
            let list = load_waypoints(&path)?;
            let viewer = FixedViewer {
                id: ViewerId::new(),
                location: Location::new(world, 0.0, 64.0, 0.0),
            };

            let kind = match display {
                Some(DisplayArg::Beacon) => DisplayKind::Beacon,
                Some(DisplayArg::Particle) => DisplayKind::Particle,
                None => resolver.display().kind,
            };
            let sent = match kind {
                DisplayKind::Beacon => {
                    let engine =
                        simulate(BeaconDisplay::new(LoggingBeacons::default()), viewer, resolver, &list, ticks)
                            .await;
                    engine.display().renderer().sent.load(Ordering::Relaxed)
                }
                DisplayKind::Particle => {
                    let engine = simulate(
                        ParticleDisplay::new(LoggingParticles::default()),
                        viewer,
                        resolver,
                        &list,
                        ticks,
                    )
                    .await;
                    engine.display().renderer().sent.load(Ordering::Relaxed)
                }
            };
            println!("Simulation finished, {sent} render calls");
        }
    }

    Ok(())
}

fn load_resolver(path: Option<&Path>) -> Result<ConfigResolver, String> {
    let config = match path {
        Some(path) => WaypointsConfig::load_from(path),
        None => WaypointsConfig::load(),
    }
    .map_err(|e| e.to_string())?;
    config.resolve().map_err(|e| e.to_string())
}

fn load_translations(path: Option<&Path>) -> Result<TranslationTable, String> {
    if let Some(path) = path {
        return TranslationTable::load(path).map_err(|e| e.to_string());
    }
    let fallback = default_translations_dir().map(|dir| dir.join("en.toml"));
    match fallback {
        Some(path) if path.exists() => TranslationTable::load(&path).map_err(|e| e.to_string()),
        _ => Ok(TranslationTable::new()),
    }
}

fn load_waypoints(path: &Path) -> Result<WaypointList, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?;
    let (list, failures) = json::load_list(&value).map_err(|e| format!("{}: {e}", path.display()))?;
    for LoadFailure { index, error } in &failures {
        println!("  skipped entry {index}: {error}");
    }
    println!(
        "Loaded {} waypoints ({} skipped) from {}",
        list.len(),
        failures.len(),
        path.display()
    );
    Ok(list)
}

fn print_defaults(resolver: &ConfigResolver) {
    println!("Update interval: {:?}", resolver.update_interval());
    println!("Display: {:?}", resolver.display().kind);
    for category in waypoints_types::WaypointCategory::ALL {
        println!(
            "  {:<11} icon {:<16} beacon {}",
            category,
            resolver.default_icon(category),
            resolver.default_beacon_color(category)
        );
    }
}

fn inspect(list: &WaypointList, resolver: &ConfigResolver, translations: &TranslationTable) {
    for shared in list.iter() {
        let waypoint = read_waypoint(shared);
        let source = |is_override: bool| if is_override { "override" } else { "default" };
        let icon = waypoint_icon(&waypoint, resolver, translations, None);

        println!("{} [{}] {}", waypoint.name(), waypoint.category(), waypoint.id());
        let location = waypoint.location();
        let coordinate = |n: f64| format_coordinate(n, resolver.european_number_format());
        println!(
            "  at        {} {} {} {}",
            location.world,
            coordinate(location.x),
            coordinate(location.y),
            coordinate(location.z)
        );
        println!(
            "  material  {} ({})",
            waypoint.resolve_material(resolver),
            source(waypoint.material_override().is_some())
        );
        println!(
            "  beacon    {} ({})",
            waypoint.resolve_beacon_color(resolver),
            source(waypoint.beacon_color_override().is_some())
        );
        println!("  icon      {}", icon.name.unwrap_or_default());
        for line in icon.lore {
            println!("            {line}");
        }
    }
}

async fn simulate<D: WaypointDisplay + 'static>(
    display: D,
    viewer: FixedViewer,
    resolver: Arc<ConfigResolver>,
    list: &WaypointList,
    ticks: u32,
) -> Arc<DisplayEngine<D, FixedViewer>> {
    let viewer_id = viewer.id;
    let settings = EngineConfig::from_resolver(&resolver);
    let engine = Arc::new(DisplayEngine::new(display, viewer, resolver, settings));

    for shared in list.iter() {
        let outcome = engine.show(viewer_id, shared);
        tracing::debug!(?outcome, "show");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn_scheduler(Arc::clone(&engine), shutdown_rx);
    tokio::time::sleep(settings.update_interval() * ticks + Duration::from_millis(50)).await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = handle.await {
        tracing::error!(error = %e, "Scheduler task failed");
    }

    let disabled = engine.disable(viewer_id);
    println!("Disabled {disabled} sessions");
    engine
}
