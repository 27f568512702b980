// src/bin/api_server.rs

use anyhow::Context;
use fulcanellie_staking_api::infra::config::{self, ServerSettings, DEFAULT_LOG_FILTER};
use fulcanellie_staking_api::solana::{SolanaPaymentVerifier, SolanaRpc};
use fulcanellie_staking_api::transport::http::{self, ApiDoc, AppState, ROUTES};
use fulcanellie_staking_api::{InMemoryLedger, StakingService, TierPolicy};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    // --- Configuration (fail fast: no routes without a complete config) ---
    println!("> Resolving staking configuration...");
    let staking_config = Arc::new(
        config::resolve().context("refusing to start without a staking configuration")?,
    );
    let settings = ServerSettings::from_env()?;
    println!(
        "> Network: {} | program: {} | mint: {} | store wallet: {}",
        staking_config.network,
        staking_config.program_id,
        staking_config.mint_address,
        staking_config.zoo_store_wallet
    );

    // --- Collaborators ---
    let rpc_url = settings.rpc_url_for(&staking_config.network);
    println!("> Solana RPC: {}", rpc_url);
    let verifier = SolanaPaymentVerifier::new(SolanaRpc::new(rpc_url), &staking_config);
    let ledger = InMemoryLedger::new(settings.unstake_cooldown);
    println!(
        "> In-memory staking ledger initialized (unstake cooldown {}s).",
        settings.unstake_cooldown.as_secs()
    );

    let service = StakingService::new(
        staking_config.clone(),
        TierPolicy::default(),
        Arc::new(ledger),
        Arc::new(verifier),
    );
    let app_state = AppState {
        service: Arc::new(service),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let bind_addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    println!("> API server listening on http://{}", bind_addr);
    println!("> Routes:");
    for (method, path) in ROUTES {
        println!(">   {:<5} {}", method, path);
    }
    println!("> Swagger UI available at http://{}/swagger-ui", bind_addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("\n> Shutdown signal received (Ctrl+C). Bye.");
        }
    }

    Ok(())
}
