//! CLI argument definitions using clap

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect how edgeward enriches requests for an API definition
#[derive(Parser, Debug)]
#[command(name = "edgeward", version, about, long_about = None)]
pub struct Args {
    /// Verbose logging. Use -vv for debug and -vvv for trace output
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log as JSON lines instead of text
    #[arg(long = "log-json", global = true, env = "EDGEWARD_LOG_JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one request through the middleware chain and show what is sent upstream
    Inspect {
        /// API definition file (JSON, YAML or TOML)
        api_def: PathBuf,

        /// Request method
        #[arg(short = 'X', long = "method", default_value = "GET")]
        method: String,

        /// Request path and query
        #[arg(long = "path", default_value = "/")]
        path: String,

        /// Inbound request header, as "Name: value"
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },

    /// Run one analytics record through the API's analytics plugin
    Analytics {
        /// API definition file (JSON, YAML or TOML)
        api_def: PathBuf,

        /// Record to process, as JSON. Defaults to a record for GET /
        #[arg(long = "record")]
        record: Option<String>,
    },
}
