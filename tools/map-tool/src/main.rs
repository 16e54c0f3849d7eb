//! map-tool: generate and inspect tile maps, query paths, run scripted simulations.
//!
//! Usage:
//!   map-tool generate --output world.tmap --width 120 --height 80
//!   map-tool preview --map world.tmap --path 10,10:40,30
//!   map-tool path --from 10,10 --to 40,30 --map world.tmap
//!   map-tool simulate --commands script.json --ticks 600

use std::path::PathBuf;
use std::process;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tileworld_core::commands::PlayerCommand;
use tileworld_core::enums::TileType;
use tileworld_core::events::GameEvent;
use tileworld_core::types::{Path, TileCoord};
use tileworld_sim::pathfinding::find_path;
use tileworld_sim::{SimConfig, SimulationEngine};
use tileworld_terrain::tmap::{load_tmap, write_tmap};
use tileworld_terrain::TileMap;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    init_logger(has_flag(&args, "--verbose"));

    match args[1].as_str() {
        "generate" => cmd_generate(&args[2..]),
        "preview" => cmd_preview(&args[2..]),
        "path" => cmd_path(&args[2..]),
        "simulate" => cmd_simulate(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

/// Log to stderr so stdout stays clean for JSON output.
fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

fn print_usage() {
    eprintln!(
        "map-tool: tileworld map and simulation tool\n\
         \n\
         Commands:\n\
         \n\
         generate  Generate a terrain map and write it as .tmap\n\
         \n\
           --output <path>    Output .tmap file path\n\
           --width <N>        Map width in tiles (default: 200)\n\
           --height <N>       Map height in tiles (default: 200)\n\
           --tile-size <S>    Tile edge in pixels (default: 32)\n\
           --config <path>    TOML config supplying the defaults above\n\
         \n\
         preview   Print a map as ASCII ('.' grass, '~' water, '=' dirt path)\n\
         \n\
           --map <path>       .tmap file (default: map from --config)\n\
           --path <x,y:x,y>   Overlay the path between two tiles with '*'\n\
           --config <path>    TOML config for map and tile overrides\n\
         \n\
         path      Print the path between two tiles as JSON\n\
         \n\
           --from <x,y>       Start tile\n\
           --to <x,y>         Goal tile\n\
           --map <path>       .tmap file (default: map from --config)\n\
           --config <path>    TOML config for map and tile overrides\n\
         \n\
         simulate  Run a JSON list of commands and print the final snapshot\n\
         \n\
           --commands <path>  JSON array of commands\n\
           --ticks <N>        Ticks to run (default: 60)\n\
           --config <path>    TOML simulation config\n\
           --map <path>       .tmap file to play on instead of the configured map\n\
         \n\
         Global:\n\
         \n\
           --verbose          Debug logging (RUST_LOG overrides)\n\
         \n\
         Examples:\n\
         \n\
           map-tool generate --output world.tmap --width 120 --height 80\n\
           map-tool preview --map world.tmap --path 10,10:40,30\n\
           map-tool simulate --commands script.json --ticks 600 > final.json\n"
    );
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| pair[0] == flag)
        .map(|pair| pair[1].as_str())
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    match parse_value(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Error: {flag} expects a number, got {raw:?}");
                process::exit(1);
            }
        },
        None => default,
    }
}

fn parse_tile(raw: &str) -> Option<TileCoord> {
    let (x, y) = raw.split_once(',')?;
    Some(TileCoord::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

fn require_tile(args: &[String], flag: &str) -> TileCoord {
    match parse_value(args, flag).and_then(parse_tile) {
        Some(t) => t,
        None => {
            eprintln!("Error: {flag} <x,y> is required");
            process::exit(1);
        }
    }
}

fn load_config(args: &[String]) -> SimConfig {
    let Some(path) = parse_value(args, "--config") else {
        return SimConfig::default();
    };
    match SimConfig::load(&PathBuf::from(path)) {
        Ok(config) => config,
        Err(e) => {
            error!(path, error = %e, "invalid config");
            process::exit(1);
        }
    }
}

/// The map named by `--map`, or the map `config` describes.
fn load_map(args: &[String], config: &SimConfig) -> TileMap {
    let result = match parse_value(args, "--map") {
        Some(path) => load_tmap(&PathBuf::from(path)).map_err(|e| e.to_string()),
        None => config.build_map().map_err(|e| e.to_string()),
    };
    match result {
        Ok(map) => map,
        Err(e) => {
            error!(error = %e, "could not load map");
            process::exit(1);
        }
    }
}

/// Path between two tiles using the configured tile definitions.
fn plan_path(config: &SimConfig, map: &TileMap, from: TileCoord, to: TileCoord) -> Option<Path> {
    find_path(map, &config.tile_set(), from, to)
}

fn log_summary(map: &TileMap) {
    info!(
        width = map.width(),
        height = map.height(),
        grass = map.count(TileType::Grass),
        water = map.count(TileType::Water),
        dirt = map.count(TileType::DirtPath),
        "map"
    );
}

// --- Generate command ---

fn cmd_generate(args: &[String]) {
    let output = match parse_value(args, "--output") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --output <path> is required");
            process::exit(1);
        }
    };

    let mut config = load_config(args);
    config.map.width = parse_number(args, "--width", config.map.width);
    config.map.height = parse_number(args, "--height", config.map.height);
    config.map.tile_size = parse_number(args, "--tile-size", config.map.tile_size);
    config.map.generate_terrain = true;

    let map = match config.build_map() {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "could not generate map");
            process::exit(1);
        }
    };
    log_summary(&map);

    match write_tmap(&map, &output) {
        Ok(()) => {
            let file_size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
            info!(path = %output.display(), bytes = file_size, "wrote map");
        }
        Err(e) => {
            error!(path = %output.display(), error = %e, "could not write map");
            process::exit(1);
        }
    }
}

// --- Preview command ---

fn cmd_preview(args: &[String]) {
    let config = load_config(args);
    let map = load_map(args, &config);
    log_summary(&map);

    let mut rows: Vec<Vec<char>> = map.to_ascii().iter().map(|r| r.chars().collect()).collect();

    if let Some(raw) = parse_value(args, "--path") {
        let endpoints = raw
            .split_once(':')
            .and_then(|(a, b)| Some((parse_tile(a)?, parse_tile(b)?)));
        let Some((from, to)) = endpoints else {
            eprintln!("Error: --path expects <x,y:x,y>, got {raw:?}");
            process::exit(1);
        };
        match plan_path(&config, &map, from, to) {
            Some(path) => {
                info!(steps = path.len(), "path");
                for tile in path {
                    if let Some(cell) = rows
                        .get_mut(tile.y as usize)
                        .and_then(|row| row.get_mut(tile.x as usize))
                    {
                        *cell = '*';
                    }
                }
            }
            None => info!(%from, %to, "no path"),
        }
    }

    for row in rows {
        println!("{}", row.into_iter().collect::<String>());
    }
}

// --- Path command ---

fn cmd_path(args: &[String]) {
    let from = require_tile(args, "--from");
    let to = require_tile(args, "--to");
    let config = load_config(args);
    let map = load_map(args, &config);

    let path = plan_path(&config, &map, from, to);
    match &path {
        Some(p) => info!(%from, %to, steps = p.len(), "path found"),
        None => info!(%from, %to, "no path"),
    }
    match serde_json::to_string(&path) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "could not encode path");
            process::exit(1);
        }
    }
}

// --- Simulate command ---

fn cmd_simulate(args: &[String]) {
    let commands_path = match parse_value(args, "--commands") {
        Some(p) => PathBuf::from(p),
        None => {
            eprintln!("Error: --commands <path> is required");
            process::exit(1);
        }
    };
    let commands: Vec<PlayerCommand> = match std::fs::read_to_string(&commands_path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()))
    {
        Ok(c) => c,
        Err(e) => {
            error!(path = %commands_path.display(), error = %e, "could not read commands");
            process::exit(1);
        }
    };
    let ticks: u64 = parse_number(args, "--ticks", 60);

    let config = load_config(args);
    let engine = match parse_value(args, "--map") {
        Some(_) => {
            let map = load_map(args, &config);
            SimulationEngine::with_map(config, map)
        }
        None => SimulationEngine::new(config),
    };
    let mut engine = match engine {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, "could not start simulation");
            process::exit(1);
        }
    };

    info!(commands = commands.len(), ticks, "simulating");
    engine.queue_commands(commands);

    let mut snapshot = engine.snapshot();
    let mut rejected = 0usize;
    for _ in 0..ticks {
        snapshot = engine.tick();
        rejected += snapshot
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CommandRejected { .. }))
            .count();
    }
    info!(
        tick = snapshot.time.tick,
        units = snapshot.units.len(),
        rejected,
        "simulation finished"
    );

    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!(error = %e, "could not encode snapshot");
            process::exit(1);
        }
    }
}
