use clap::Parser;

use edgeward::cli::{self, Args};
use edgeward::status::ExitStatus;

/// Initialize structured logging with tracing
fn init_logging(verbose: u8, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}

fn main() -> ExitStatus {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitStatus::Usage
            } else {
                ExitStatus::Success
            };
        }
    };

    init_logging(args.verbose, args.log_json);

    let stdout = std::io::stdout();
    match cli::run(&args, &mut stdout.lock()) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("edgeward: error: {}", e);
            ExitStatus::Error
        }
    }
}
