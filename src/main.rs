// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use buddy_server::{
    api::router,
    auth::{ClientTypeRegistry, InMemoryAccountDirectory},
    config::AppConfig,
    logging,
    state::AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(config.log_format);

    // Account persistence is external; the in-memory directory only holds
    // the optional development account.
    let mut accounts = InMemoryAccountDirectory::new();
    if let Some(seed) = &config.seed_account {
        if let Err(e) = accounts.insert_adopter(seed.email.clone(), &seed.password) {
            tracing::error!(error = %e, email = %seed.email, "Failed to seed development account");
            return ExitCode::FAILURE;
        }
        tracing::info!(email = %seed.email, "Seeded development account");
    }

    for rule in &config.client_rules {
        tracing::info!(origin = %rule.code, client = %rule.category, "Client origin rule");
    }

    let state = AppState::with_jwt_issuer(
        &config.tokens,
        Arc::new(accounts),
        ClientTypeRegistry::new(config.client_rules.clone()),
    );
    let app = router(state);

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(error = %e, host = %config.host, "Failed to parse bind address");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%addr, "Buddy server listening (docs at /docs)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "HTTP server failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
