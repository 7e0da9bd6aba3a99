// ABOUTME: Server binary: configuration load, logging bootstrap, and the serve loop
// ABOUTME: All settings come from the environment; the port can be overridden on the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Mealplan Server Project

//! # Mealplan API Server Binary

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use mealplan_server::{config::ServerConfig, logging, server, server::ServerResources};
use tracing::info;

#[derive(Parser)]
#[command(name = "mealplan-server")]
#[command(about = "Meal planning API - recipes, ingredients, and calendar meal plans")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("starting mealplan server");
    info!("{}", config.summary());

    let resources = Arc::new(ServerResources::from_config(&config)?);
    server::serve(&config, resources).await
}
