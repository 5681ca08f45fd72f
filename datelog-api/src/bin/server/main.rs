use std::sync::Arc;

use auth::Authenticator;
use datelog_api::config::Config;
use datelog_api::domain::user::service::UserService;
use datelog_api::inbound::http::router::create_router;
use datelog_api::outbound::repositories::InMemoryUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "datelog_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "datelog-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    // Fails when jwt.secret is absent; tokens must never be signed with a
    // fallback value.
    let config = Config::load()?;

    tracing::info!(http_port = config.server.http_port, "Configuration loaded");

    let authenticator = Arc::new(Authenticator::new(config.jwt.secret.as_bytes()));
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::clone(&authenticator),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(address = %http_address, "Http server listening");

    let http_application = create_router(user_service, authenticator);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
