//! CLI entry point - the composition root.
//!
//! Parses flags (env-backed for deployment), loads `.env`, initializes
//! logging, and hands off to the Axum adapter's bootstrap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use lienzo_axum::bootstrap::{ServerConfig, start_server};

/// Command-line interface for the lienzo image generation server.
#[derive(Parser)]
#[command(name = "lienzo")]
#[command(about = "Image generation server backed by a Replicate-style predictor")]
#[command(version)]
struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,

        /// Path to the SQLite database file
        #[arg(long, env = "DATABASE_PATH", default_value = "lienzo.db")]
        db_path: PathBuf,

        /// Directory for persisted images
        #[arg(long, env = "OUTPUT_DIR", default_value = "output")]
        output_dir: PathBuf,

        /// Predictor API token
        #[arg(long, env = "REPLICATE_API_TOKEN", hide_env_values = true)]
        token: String,

        /// Model version submitted with every prediction
        #[arg(long, env = "REPLICATE_MODEL_VERSION")]
        model_version: String,

        /// Base daily generation allowance per user
        #[arg(long, env = "DAILY_LIMIT", default_value_t = 3)]
        daily_limit: u32,

        /// Restrict CORS to these origins (default: allow all)
        #[arg(long = "allow-origin", env = "ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before parsing env-backed flags
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Serve {
            port,
            db_path,
            output_dir,
            token,
            model_version,
            daily_limit,
            allowed_origins,
        } => {
            let mut config = ServerConfig::new(token, model_version);
            config.port = port;
            config.db_path = db_path;
            config.output_dir = output_dir;
            config.daily_limit = daily_limit;
            if !allowed_origins.is_empty() {
                config = config.with_allowed_origins(allowed_origins);
            }
            start_server(config).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::parse_from([
            "lienzo",
            "serve",
            "--port",
            "8080",
            "--token",
            "r8_test",
            "--model-version",
            "abc",
            "--daily-limit",
            "5",
        ]);
        match cli.command {
            Some(Commands::Serve {
                port, daily_limit, ..
            }) => {
                assert_eq!(port, 8080);
                assert_eq!(daily_limit, 5);
            }
            _ => panic!("expected serve command"),
        }
    }
}
