//! Command-line interface for ini2xml
//! This binary converts one INI-style configuration file into one XML file.
//!
//! Usage:
//!   ini2xml `<input>` `<output>` [--format `<format>`] [--config `<file>`]  - Convert a file
//!   ini2xml --list-formats                                                - List output formats

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Command};
use ini2xml::ini2xml::config::{ConfigLoader, ConverterConfig};
use ini2xml::ini2xml::formats::FormatError;
use ini2xml::ini2xml::loader::{ConvertError, DocumentLoader};
use std::process;

fn cli() -> Command {
    Command::new("ini2xml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert an INI-style configuration file into XML")
        .arg(
            Arg::new("paths")
                .help("Input file followed by output file")
                .value_name("PATH")
                .num_args(1..)
                .action(ArgAction::Append)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format (default from configuration: xml)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available output formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
}

fn main() {
    let matches = match cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(_) => invalid_syntax(),
    };

    init_logger(matches.get_count("verbose"));

    let list_formats = matches.get_flag("list-formats");
    let paths: Vec<&String> = matches
        .get_many::<String>("paths")
        .map(|values| values.collect())
        .unwrap_or_default();
    if !list_formats && paths.len() != 2 {
        invalid_syntax();
    }

    let config = load_config(&matches);
    let loader = DocumentLoader::with_config(&config.output);

    if list_formats {
        handle_list_formats_command(&loader);
        return;
    }

    handle_convert_command(&loader, paths[0], paths[1], &config.output.format);
}

fn invalid_syntax() -> ! {
    println!("Invalid command syntax.");
    process::exit(1);
}

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Defaults, then the `--config` file, then the `--format` flag
fn load_config(matches: &ArgMatches) -> ConverterConfig {
    let mut loader = ConfigLoader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    let config = match matches.get_one::<String>("format") {
        Some(format) => loader
            .set_override("output.format", format.as_str())
            .and_then(ConfigLoader::build),
        None => loader.build(),
    };

    config.unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        process::exit(1);
    })
}

/// Handle the convert command
fn handle_convert_command(loader: &DocumentLoader, input: &str, output: &str, format: &str) {
    match loader.convert_file(input, output, format) {
        Ok(()) => {}
        Err(ConvertError::InputNotFound(_)) => {
            println!("Input file not found.");
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if let ConvertError::Format(FormatError::UnknownFormat(_)) = e {
                eprintln!("Available formats: {}", loader.registry().names().join(", "));
            }
            process::exit(1);
        }
    }
}

/// Handle the list-formats command
fn handle_list_formats_command(loader: &DocumentLoader) {
    println!("Available output formats:\n");

    for formatter in loader.registry().formatters() {
        println!("  {}", formatter.name());
        println!("    {}", formatter.description());
        println!();
    }
}
