//! Magic Link Integration Tests
//!
//! Runs against a live magic link server using the magiclink-client library.
//! Point it at a server with `MAGICLINK_SERVER_URL` and supply the same
//! `MAGICLINK_ADMIN_SECRET` the server was started with.

use anyhow::{ensure, Result};
use futures::future::join_all;
use magiclink_client::{Error, MagicLinkClient, MagicLinkClientOptions};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "magiclink_integration_tests=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = MagicLinkClientOptions::from_env();

    tracing::info!("Magic Link Integration Tests");
    tracing::info!("   Server: {}", options.url);
    tracing::info!(
        "   Admin secret: {}",
        if options.admin_secret.is_some() {
            "set"
        } else {
            "not set"
        }
    );

    test_link_lifecycle().await?;
    test_admin_requires_secret().await?;
    test_revoke_is_final().await?;
    test_parallel_views_are_counted().await?;

    tracing::info!("All tests passed!");

    Ok(())
}

async fn create_client() -> Result<MagicLinkClient> {
    let options = MagicLinkClientOptions::from_env();
    Ok(MagicLinkClient::with_options(options).await?)
}

/// Create, view, list, revoke
async fn test_link_lifecycle() -> Result<()> {
    tracing::info!("Test: Link Lifecycle");

    let client = create_client().await?;

    let link = client.create_link(Some("Integration"), Some(5)).await?;
    ensure!(link.ttl_minutes == 5, "TTL should be echoed back");
    ensure!(link.url.ends_with(&link.token), "URL should embed the token");
    tracing::info!("   CREATE → {} (expires {})", link.url, link.expires_at);

    let view = client.view_link(&link.token).await?;
    ensure!(view.access_count == 1, "First view should count once");
    ensure!(view.label == "Integration", "Label should round-trip");
    ensure!(view.remaining_minutes == 5, "Almost all of the TTL should remain");
    tracing::info!("   VIEW → {}ms left", view.remaining_ms);

    let listed = client.list_links().await?;
    let summary = listed
        .iter()
        .find(|l| l.token == link.token)
        .ok_or_else(|| anyhow::anyhow!("created link missing from list"))?;
    ensure!(summary.access_count == 1, "List should report the view");
    tracing::info!("   LIST → {} active links", listed.len());

    client.revoke_link(&link.token).await?;
    tracing::info!("   REVOKE → ok");

    tracing::info!("   ✓ Lifecycle works correctly");
    Ok(())
}

/// Admin calls without the right secret are rejected; viewing needs no secret
async fn test_admin_requires_secret() -> Result<()> {
    tracing::info!("Test: Admin Secret");

    let admin = create_client().await?;
    let link = admin.create_link(Some("secret-check"), None).await?;

    let url = MagicLinkClientOptions::from_env().url;
    let anonymous = MagicLinkClient::connect(&url).await?;
    let wrong = MagicLinkClient::with_options(
        MagicLinkClientOptions::new(url).with_admin_secret("definitely-not-the-secret"),
    )
    .await?;

    for client in [&anonymous, &wrong] {
        match client.create_link(None, None).await {
            Err(Error::InvalidSecret(_)) => {}
            other => {
                anyhow::bail!("expected InvalidSecret, got {:?}", other.map(|l| l.token))
            }
        }
        match client.revoke_link(&link.token).await {
            Err(Error::InvalidSecret(_)) => {}
            other => anyhow::bail!("expected InvalidSecret, got {:?}", other),
        }
    }

    let view = anonymous.view_link(&link.token).await?;
    ensure!(view.access_count == 1, "Viewing should not need the secret");

    admin.revoke_link(&link.token).await?;

    tracing::info!("   ✓ Secret is enforced on admin calls only");
    Ok(())
}

async fn test_revoke_is_final() -> Result<()> {
    tracing::info!("Test: Revoke Finality");

    let client = create_client().await?;
    let link = client.create_link(None, None).await?;
    ensure!(link.label == "Unnamed", "Missing label should default");

    client.revoke_link(&link.token).await?;

    ensure!(
        matches!(client.revoke_link(&link.token).await, Err(Error::NotFound)),
        "Second revoke should report NotFound"
    );
    ensure!(
        matches!(client.view_link(&link.token).await, Err(Error::NotFound)),
        "Revoked link should not be viewable"
    );

    tracing::info!("   ✓ Revoked links are gone");
    Ok(())
}

/// Concurrent viewers of one link must not lose access count updates
async fn test_parallel_views_are_counted() -> Result<()> {
    let num_views = 200;
    tracing::info!("Test: Parallel Views ({} concurrent)", num_views);

    let client = create_client().await?;
    let link = client.create_link(Some("parallel"), Some(10)).await?;
    let start = Instant::now();

    let views: Vec<_> = (0..num_views)
        .map(|_| {
            let client = client.clone();
            let token = link.token.clone();
            async move { client.view_link(token).await }
        })
        .collect();

    for result in join_all(views).await {
        result?;
    }
    tracing::info!("   {} views in {:?}", num_views, start.elapsed());

    let last = client.view_link(&link.token).await?;
    ensure!(
        last.access_count == num_views + 1,
        "Expected {} accesses, server reports {}",
        num_views + 1,
        last.access_count
    );

    client.revoke_link(&link.token).await?;

    tracing::info!("   ✓ Every view was counted");
    Ok(())
}
