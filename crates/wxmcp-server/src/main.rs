//! wxmcp - weather and news tools from the command line.
//!
//! Commands:
//! - `tools` - List registered tools
//! - `call` - Invoke one tool and print its result

#![forbid(unsafe_code)]

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use wxmcp_logging::{LogFacility, Logger, exception, info, warning};
use wxmcp_server::{HttpFetcher, Server, ServerConfig};

/// wxmcp - weather and news tools.
#[derive(Parser)]
#[command(name = "wxmcp")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a TOML config file (default: <config dir>/wxmcp/config.toml).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Console log level (DEBUG, INFO, WARNING, ERROR, CRITICAL).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log file path.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Logger name.
    #[arg(long, global = true)]
    log_name: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered tools.
    Tools {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Call a tool and print its result.
    Call {
        /// Tool name.
        tool: String,

        /// String argument (KEY=VALUE format).
        #[arg(long = "arg", short = 'a', value_parser = parse_key_val)]
        args: Vec<(String, String)>,

        /// Arguments as a JSON object; merged under --arg values.
        #[arg(long)]
        json: Option<String>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("invalid KEY=VALUE: no '=' found in '{s}'"))
}

fn load_config(cli: &Cli) -> Result<ServerConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => match ServerConfig::default_path().filter(|p| p.is_file()) {
            Some(path) => ServerConfig::load(&path)?,
            None => ServerConfig::default(),
        },
    }
    .with_env();

    if let Some(level) = &cli.log_level {
        config.log.level.clone_from(level);
    }
    if let Some(file) = &cli.log_file {
        config.log.file.clone_from(file);
    }
    if let Some(name) = &cli.log_name {
        config.log.name.clone_from(name);
    }
    Ok(config)
}

fn call_arguments(
    args: &[(String, String)],
    json: Option<&str>,
) -> Result<serde_json::Value, Box<dyn Error>> {
    let mut object = match json {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(raw)? {
            serde_json::Value::Object(map) => map,
            _ => return Err("--json must be a JSON object".into()),
        },
        None => serde_json::Map::new(),
    };
    for (key, value) in args {
        object.insert(key.clone(), serde_json::Value::String(value.clone()));
    }
    Ok(serde_json::Value::Object(object))
}

fn run(cli: &Cli, config: &ServerConfig, logger: &Logger) -> Result<(), Box<dyn Error>> {
    let fetcher = Arc::new(HttpFetcher::new()?);
    let server = Server::from_config(config, logger, fetcher);

    match &cli.command {
        Commands::Tools { json } => {
            let tools = server.tools();
            if *json {
                println!("{}", serde_json::to_string_pretty(&tools)?);
            } else {
                for tool in tools {
                    println!("{:<24} {}", tool.name, tool.description);
                }
            }
        }
        Commands::Call { tool, args, json } => {
            let arguments = call_arguments(args, json.as_deref())?;
            let result = server.call_tool(tool, &arguments)?;
            println!("{result}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let facility = LogFacility::global();
    let logger = match facility.get_with(&config.log) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Error: failed to configure logging: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = facility.install() {
        warning!(logger, "log facade already installed: {}", err);
    }

    let code = match run(&cli, &config, &logger) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            exception!(logger, err.as_ref(), "Server error");
            ExitCode::FAILURE
        }
    };

    info!(logger, "Server terminated");
    logger.flush();
    code
}
