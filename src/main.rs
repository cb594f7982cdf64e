use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use dental_core::{CoreConfig, DentalServices, in_memory_store, recent_limit_from_env_value};
use record_store::{Clock, Seed, SystemClock};

/// Main entry point for the dental records service
///
/// Resolves configuration from the environment once, builds the record store and the
/// entity services, and serves the REST API.
///
/// # Environment Variables
/// - `DENTAL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DENTAL_RECENT_LIMIT`: Default number of "recent treatments" (default: 10)
/// - `DENTAL_SEED_FILE`: Optional YAML/JSON seed loaded into the in-memory store
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, seeding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dental=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("record_store=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("DENTAL_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let recent_limit = recent_limit_from_env_value(std::env::var("DENTAL_RECENT_LIMIT").ok())?;

    let seed = match std::env::var("DENTAL_SEED_FILE").ok().map(PathBuf::from) {
        Some(path) => {
            tracing::info!("++ Loading seed records from {}", path.display());
            Some(Seed::load(&path)?)
        }
        None => None,
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let cfg = Arc::new(CoreConfig::new(recent_limit, clock.clone())?);
    let store = in_memory_store(clock, seed)?;
    let services = DentalServices::new(Arc::new(store), cfg);

    tracing::info!("++ Starting dental REST on {}", rest_addr);
    api_rest::serve(&rest_addr, AppState::new(services)).await?;

    Ok(())
}
