use clap::Parser;

use quizwhiz_client::{app_state::AppState, cli::Cli, config::Config, errors::AppResult, handlers};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        log::debug!("Command failed with {}", e.error_code());
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::from_env();
    log::debug!("Using API at {}", config.api_base_url);

    let state = AppState::new(config)?;
    state.init_session();
    handlers::dispatch(&state, cli.command).await
}
