mod auth;
mod config;
mod service;

use auth::admin_secret_interceptor;
use config::ServerConfig;
use magiclink_core::{Registry, Sweeper};
use magiclink_proto::link_admin_server::LinkAdminServer;
use magiclink_proto::link_viewer_server::LinkViewerServer;
use service::{AdminService, ViewerService};
use tonic::transport::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "magiclink_server=info,magiclink_core=info,tonic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let addr = config.addr().parse()?;

    if config.uses_fallback_secret() {
        tracing::warn!("MAGICLINK_ADMIN_SECRET is not set; using the built-in fallback secret");
    }

    let registry = Registry::with_config(config.registry_config());
    let sweeper = Sweeper::new(registry.clone(), config.sweep_interval).spawn();

    let admin = AdminService::new(registry.clone(), config.base_url.clone());
    let viewer = ViewerService::new(registry);

    tracing::info!("Magic link gRPC server listening on {}", addr);
    tracing::info!("   Share URLs: {}/view/<token>", config.base_url);
    tracing::info!("   Default TTL: {}m", config.default_ttl_minutes);
    tracing::info!("   Sweep interval: {}s", config.sweep_interval.as_secs());

    Server::builder()
        .add_service(LinkAdminServer::with_interceptor(
            admin,
            admin_secret_interceptor(config.admin_secret.clone()),
        ))
        .add_service(LinkViewerServer::new(viewer))
        .serve_with_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutting down");
        })
        .await?;

    sweeper.stop().await;

    Ok(())
}
