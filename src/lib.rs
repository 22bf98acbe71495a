pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use clap::{Parser, Subcommand};
use config::ClientConfig;
use error::AppError;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Leaf disease analyzer client", long_about = None)]
struct Cli {
    /// Backend base URL (defaults to the hosted classifier)
    #[arg(long, global = true, env = config::API_URL_ENV)]
    api_url: Option<String>,

    /// Seconds to wait for the health probe
    #[arg(long, global = true, default_value = "5", value_parser = parse_seconds)]
    health_timeout: Duration,

    /// Seconds to wait for a prediction (no limit by default)
    #[arg(long, global = true, value_parser = parse_seconds)]
    request_timeout: Option<Duration>,

    /// Multipart field the backend reads the image from
    #[arg(long, global = true, default_value = config::DEFAULT_UPLOAD_FIELD)]
    upload_field: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload leaf photos and chart the top predicted diseases
    Predict {
        /// Images to classify, one request each
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Save the result view state as JSON
        #[arg(long)]
        save: Option<PathBuf>,

        /// Also draw the chart as a PNG
        #[arg(long)]
        png: Option<PathBuf>,

        /// Don't probe /health first
        #[arg(long)]
        skip_health: bool,
    },
    /// Check that the backend is reachable
    Health,
    /// Show the last prediction the backend stored
    Latest {
        #[arg(long)]
        skip_health: bool,
    },
    /// Show a result saved with `predict --save`
    Show { state: PathBuf },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(self.api_url.as_deref());
        config.upload_field = self.upload_field.clone();
        config.health_timeout = self.health_timeout;
        config.request_timeout = self.request_timeout;
        if let Command::Predict { save, png, .. } = &self.command {
            config.save_path = save.clone();
            config.png_path = png.clone();
        }
        config
    }
}

/// A positive, finite number of seconds.
fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("`{}` is not a number of seconds", value))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("`{}` must be a positive number of seconds", value));
    }
    Duration::try_from_secs_f64(secs).map_err(|e| e.to_string())
}

pub fn run() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.client_config();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result: Result<(), AppError> = runtime.block_on(async {
        match &cli.command {
            Command::Predict { images, skip_health, .. } => {
                commands::predict::predict_images(&config, images, *skip_health).await
            }
            Command::Health => commands::health::check_backend(&config).await,
            Command::Latest { skip_health } => {
                commands::latest::show_latest(&config, *skip_health).await
            }
            Command::Show { state } => {
                commands::show::show_result(state);
                Ok(())
            }
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Exiting with {:?}", e.kind);
            ExitCode::FAILURE
        }
    }
}
