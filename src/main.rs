use std::env;
use std::process::ExitCode;

use clap::Parser;
use config::Config;
use dotenvy::dotenv;

use stock_client::cli::{self, Cli};
use stock_client::models::config::ClientConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let settings = Config::builder()
        // Add `./config/default.yaml`
        .add_source(config::File::with_name("config/default"))
        // Add environment-specific overrides
        .add_source(config::File::with_name(&format!("config/{}", app_env)).required(false))
        // Add settings from the environment (with a prefix of APP)
        .add_source(config::Environment::with_prefix("APP"))
        .build();

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("Error loading settings: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let client_config = match settings.try_deserialize::<ClientConfig>() {
        Ok(client_config) => client_config,
        Err(err) => {
            log::error!("Error loading client config: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let repo = match stock_client::connect(&client_config) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Failed to set up API client: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match cli::run(cli, &repo, &client_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if repo.session().take_expired() {
                eprintln!("session expired, run `stock-client login` again");
            }
            ExitCode::FAILURE
        }
    }
}
