//! Subcommands: each reads a JSON request, calls into the engine and returns
//! a JSON value for stdout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use stocksync_analytics::{SyncRunRecord, WarehouseMetrics};
use stocksync_core::{
    ConflictStrategy, InventoryItem, ProductSyncRecord, SyncConfiguration, WarehouseId,
};

#[derive(Debug, Parser)]
#[command(name = "stocksync", about = "Plan and inspect cross-warehouse inventory sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate, score and batch records for one target warehouse.
    Plan {
        /// JSON file with `targetWarehouse`, `records` and optional `inventory`.
        request: PathBuf,
    },
    /// Recommend the order in which peers receive a warehouse's changes.
    Schedule {
        source: String,
        #[arg(required = true)]
        peers: Vec<String>,
    },
    /// Arbitrate between a local and a remote inventory record.
    Resolve {
        /// JSON file with `local` and `remote`.
        request: PathBuf,
        /// Overrides the configured strategy.
        #[arg(long)]
        strategy: Option<ConflictStrategy>,
    },
    /// Summarize sync run history.
    Analyze {
        /// JSON file with `history` and optional `warehouses`.
        request: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub target_warehouse: WarehouseId,
    pub records: Vec<ProductSyncRecord>,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub local: InventoryItem,
    pub remote: InventoryItem,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub history: Vec<SyncRunRecord>,
    #[serde(default)]
    pub warehouses: Vec<WarehouseMetrics>,
}

pub fn run(command: Command, config: &SyncConfiguration, now: DateTime<Utc>) -> Result<Value> {
    let value = match command {
        Command::Plan { request } => serde_json::to_value(plan(read_json(&request)?, config, now))?,
        Command::Schedule { source, peers } => {
            let peers: Vec<WarehouseId> = peers.into_iter().map(WarehouseId::new).collect();
            serde_json::to_value(stocksync_engine::schedule_peers(
                &WarehouseId::new(source),
                &peers,
                config,
                now,
            ))?
        }
        Command::Resolve { request, strategy } => {
            let request: ResolveRequest = read_json(&request)?;
            let result = match strategy {
                Some(strategy) => stocksync_engine::resolve(&request.local, &request.remote, strategy),
                None => stocksync_engine::resolve_with_config(&request.local, &request.remote, config),
            };
            serde_json::to_value(result)?
        }
        Command::Analyze { request } => {
            let request: AnalyzeRequest = read_json(&request)?;
            serde_json::to_value(stocksync_analytics::analyze(
                &request.history,
                &request.warehouses,
            ))?
        }
    };
    Ok(value)
}

/// Run the planning pipeline with inventory supplied inline in the request.
pub fn plan(
    request: PlanRequest,
    config: &SyncConfiguration,
    now: DateTime<Utc>,
) -> stocksync_engine::SyncPlan {
    let target = request.target_warehouse;
    let inventory: HashMap<(String, WarehouseId), InventoryItem> = request
        .inventory
        .into_iter()
        .map(|item| ((item.product_id.clone(), target.clone()), item))
        .collect();

    stocksync_engine::prepare(&request.records, &target, &inventory, config, now)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
