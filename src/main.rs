use comprehend::config::GameConfig;
use comprehend::game::load_game;
use comprehend::interpreter::{GameStatus, Interpreter};
use comprehend::titles;
use comprehend::vm::VM;
use comprehend::zrand::ZRand;
use log::{debug, info};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-game configuration looked for in a game directory
const CONFIG_FILE_NAME: &str = "comprehend.toml";

fn usage(program: &str) {
    println!("comprehend - interpreter for Comprehend text adventure games");
    println!();
    println!(
        "Usage: {} <game dir | data file> [--title NAME] [--config FILE] [--seed N]",
        program
    );
    println!("Examples:");
    println!("  {} games/transylvania --title transylvania", program);
    println!("  {} games/talisman/G0 --config talisman.toml --seed 7", program);
    println!();
    println!("Known titles:");
    for config in titles::all() {
        println!("  {} ({})", config.title, config.data_file);
    }
}

/// pick_config finds the configuration for a game. An explicit file or
/// title wins, then a config file in the game directory, then a built-in
/// title whose data file is present.
fn pick_config(
    path: &Path,
    title: Option<&str>,
    config_file: Option<&Path>,
) -> Result<GameConfig, Box<dyn std::error::Error>> {
    if let Some(file) = config_file {
        return Ok(GameConfig::from_file(file)?);
    }
    if let Some(name) = title {
        return titles::by_name(name).ok_or_else(|| format!("Unknown title: {}", name).into());
    }

    if path.is_dir() {
        let local = path.join(CONFIG_FILE_NAME);
        if local.is_file() {
            debug!("using {}", local.display());
            return Ok(GameConfig::from_file(&local)?);
        }
        if let Some(config) = titles::all()
            .into_iter()
            .find(|c| path.join(&c.data_file).is_file())
        {
            return Ok(config);
        }
        return Err(format!("No known game data in {}", path.display()).into());
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(titles::all()
        .into_iter()
        .find(|c| c.data_file.eq_ignore_ascii_case(&file_name))
        .unwrap_or_else(|| GameConfig {
            data_file: file_name,
            ..GameConfig::default()
        }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        usage(&args[0]);
        return Ok(());
    }

    let game_path = PathBuf::from(&args[1]);
    let mut title = None;
    let mut config_file = None;
    let mut seed = None;

    let mut i = 2;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--title", Some(v)) => title = Some(v.clone()),
            ("--config", Some(v)) => config_file = Some(PathBuf::from(v)),
            ("--seed", Some(v)) => {
                seed = Some(
                    v.parse::<u64>()
                        .map_err(|_| format!("Invalid seed: {}", v))?,
                )
            }
            (arg, _) => {
                eprintln!("Error: unexpected argument: {}", arg);
                usage(&args[0]);
                std::process::exit(1);
            }
        }
        i += 2;
    }

    let config = match pick_config(&game_path, title.as_deref(), config_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    info!("Playing {}", config.title);

    let game = match load_game(&game_path, &config) {
        Ok(game) => game,
        Err(e) => {
            eprintln!("Error: cannot load {}: {}", game_path.display(), e);
            std::process::exit(1);
        }
    };

    let vm = VM::new(game, config.start_room)?;
    let mut interpreter = Interpreter::for_terminal(vm, config)?;
    if let Some(seed) = seed {
        interpreter.rng = ZRand::new_predictable(seed);
    }

    match interpreter.run() {
        Ok(GameStatus::Won) => {
            println!("\nCongratulations!");
            Ok(())
        }
        Ok(status) => {
            debug!("Game ended: {:?}", status);
            Ok(())
        }
        Err(e) => {
            eprintln!("\nError during execution: {e}");
            std::process::exit(1);
        }
    }
}
