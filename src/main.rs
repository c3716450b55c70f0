use std::sync::Arc;

use coffeecraft_api::{
    api::{create_router, AppState},
    config::Config,
    models::QuestionSet,
    services::{Catalog, SystemClock},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coffeecraft_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    let questions = QuestionSet::builtin()?;
    tracing::info!(
        beans = catalog.len(),
        questions = questions.len(),
        settings = ?config.diagnosis_settings(),
        "Loaded diagnosis data"
    );

    // Initialize application state
    let state = AppState::new(
        catalog,
        questions,
        config.diagnosis_settings(),
        Arc::new(SystemClock),
    );

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
