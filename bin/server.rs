// Goods Catalog - Web Server
// REST API with Axum over the immutable joined catalog

use anyhow::Context;
use goods_catalog::api::{build_router, AppState};
use goods_catalog::{init_tracing, load_settings, Catalog, LogTarget};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(&LogTarget::Stderr)?;

    let settings = load_settings()?;

    let catalog = Catalog::load(settings.data_dir.as_deref())
        .context("failed to load catalog dataset")?;
    info!(
        goods = catalog.goods.len(),
        reset_scope = ?settings.reset_scope,
        "catalog loaded"
    );

    let state = AppState {
        catalog: Arc::new(catalog),
        reset_scope: settings.reset_scope,
    };
    let app = build_router(state);

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address {:?}", settings.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(%addr, "server listening");
    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/goods", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;
    Ok(())
}
