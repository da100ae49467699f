use std::net::SocketAddr;

mod app;
mod auth;
mod config;
mod db;
mod error;
mod extract;
#[cfg(test)]
mod fakes;
mod gadgets;
mod names;
mod state;

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "gadgets=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let (app_state, db) = state::AppState::init().await?;
    db::migrate(&db).await?;

    let addr: SocketAddr =
        format!("{}:{}", app_state.config.host, app_state.config.port).parse()?;
    let app = app::build_app(app_state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
