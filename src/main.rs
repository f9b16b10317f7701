use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use video_catalog::config::{Backend, Config};
use video_catalog::infrastructure::supabase::SupabaseClient;
use video_catalog::infrastructure::{AppState, StateOptions};
use video_catalog::{db, server};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "video_catalog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // --port overrides PORT
    let args: Vec<String> = std::env::args().collect();
    if let Some(pos) = args.iter().position(|arg| arg == "--port") {
        match args.get(pos + 1).and_then(|v| v.parse().ok()) {
            Some(port) => config.port = port,
            None => {
                tracing::error!("--port expects a port number");
                return ExitCode::FAILURE;
            }
        }
    }

    let options = StateOptions {
        sync_strategy: config.sync_strategy,
        cascade_bulk_delete: config.cascade_bulk_delete,
    };

    let state = match build_state(&config, options).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "Relation sync strategy: {:?}, cascade bulk delete: {}",
        options.sync_strategy,
        options.cascade_bulk_delete
    );

    let app = server::build_router(state, &config.cors_allowed_origins);

    if let Err(e) = server::serve(app, config.port).await {
        tracing::error!("{}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn build_state(config: &Config, options: StateOptions) -> Result<AppState, String> {
    match &config.backend {
        Backend::Supabase { url, api_key } => {
            let client = SupabaseClient::new(url, api_key, config.request_timeout)
                .map_err(|e| format!("Failed to create backend client: {}", e))?;
            tracing::info!("Using PostgREST backend at {}", url);
            Ok(AppState::with_supabase(client, options))
        }
        Backend::Database { url } => {
            let db = db::init_db(url)
                .await
                .map_err(|e| format!("Failed to initialize database: {}", e))?;
            tracing::info!("Using direct database connection");
            Ok(AppState::with_database(db, options))
        }
    }
}
