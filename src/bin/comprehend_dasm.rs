use comprehend::disassembler::Disassembler;
use comprehend::game::GameData;
use log::debug;
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut function = None;
    let mut filename = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-f" => {
                i += 1;
                let value = args.get(i).ok_or("-f needs a function number")?;
                let index = usize::from_str_radix(value.trim_start_matches("0x"), 16)
                    .map_err(|_| format!("Invalid function number: {}", value))?;
                function = Some(index);
            }
            "-h" | "--help" => {
                eprintln!("Usage: {} [options] <data file>", args[0]);
                eprintln!("\nOptions:");
                eprintln!("  -f N   Only disassemble function N (hex)");
                eprintln!("  -h     Show this help message");
                std::process::exit(0);
            }
            arg if !arg.starts_with('-') => filename = Some(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let filename = filename.unwrap_or_else(|| {
        eprintln!("Usage: {} [options] <data file>", args[0]);
        eprintln!("Try '{} -h' for help", args[0]);
        std::process::exit(1);
    });

    let bytes = fs::read(&filename)?;
    debug!("Loaded {} bytes from {}", bytes.len(), filename);
    let game = GameData::from_memory(&bytes)?;
    let dasm = Disassembler::new(&game);

    match function {
        Some(index) => {
            let f = game
                .functions
                .get(index)
                .ok_or_else(|| format!("No function {:#06x}", index))?;
            let mut out = String::new();
            dasm.write_function(&mut out, index, f)?;
            print!("{}", out);
        }
        None => print!("{}", dasm),
    }
    Ok(())
}
