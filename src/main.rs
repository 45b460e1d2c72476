//! Command-line front end for canvas-bulkflow.

use canvas_bulkflow::commands::{run_download, run_upload};
use canvas_bulkflow::{logging, Config};
use std::path::PathBuf;
use std::{env, process};

const DEFAULT_CONFIG: &str = "bulkflow.toml";

#[derive(Debug, PartialEq)]
enum Command {
    Download,
    Upload,
}

#[derive(Debug)]
struct Args {
    command: Command,
    config: PathBuf,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut command = None;
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "download" if command.is_none() => command = Some(Command::Download),
            "upload" if command.is_none() => command = Some(Command::Upload),
            "-c" | "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| format!("{} requires a path", arg))?;
                config = PathBuf::from(path);
            }
            other => return Err(format!("Unexpected argument '{}'", other)),
        }
    }

    let command = command.ok_or_else(|| "Missing command".to_string())?;
    Ok(Args { command, config })
}

fn print_usage(program_name: &str) {
    println!("canvas-bulkflow - bulk download and replacement of Canvas course files");
    println!();
    println!("USAGE:");
    println!("    {} <download|upload> [--config <path>]", program_name);
    println!();
    println!("COMMANDS:");
    println!("    download       Download the files selected by the CSV export");
    println!("    upload         Overwrite Canvas files with the local replacements");
    println!();
    println!("OPTIONS:");
    println!(
        "    -c, --config   Configuration file (default: '{}')",
        DEFAULT_CONFIG
    );
    println!("    -h, --help     Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    CANVAS_API_TOKEN   Overrides canvas.token");
    println!("    CANVAS_BASE_URL    Overrides canvas.base_url");
}

#[tokio::main]
async fn main() {
    let argv: Vec<String> = env::args().collect();
    let program_name = argv
        .first()
        .map(String::as_str)
        .unwrap_or("canvas-bulkflow");

    if argv.iter().any(|a| a == "-h" || a == "--help") {
        print_usage(program_name);
        return;
    }

    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage(program_name);
            process::exit(1);
        }
    };

    let config = match Config::load_with_env(&args.config).and_then(|c| {
        c.validate()?;
        Ok(c)
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {}", args.config.display(), e);
            process::exit(1);
        }
    };

    logging::init(&config.logging);

    let result = match args.command {
        Command::Download => run_download(&config).await.map(|s| s.to_string()),
        Command::Upload => run_upload(&config).await.map(|s| s.to_string()),
    };

    match result {
        Ok(summary) => print!("{}", summary),
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
