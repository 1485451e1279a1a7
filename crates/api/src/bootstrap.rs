//! Assemble the draw engine from configuration.
//!
//! [`start_engine`] wires the production parts (file store, HTTP or
//! disabled ledger, system clock). [`start_engine_with`] takes them from the
//! caller so tests can substitute in-memory ones.

use std::sync::Arc;

use lucky_core::clock::{Clock, SystemClock};
use lucky_core::error::CoreError;
use lucky_core::prize::PrizeTable;
use lucky_engine::{DrawOrchestrator, DrawService};
use lucky_ledger::{DisabledLedger, HttpLedger, Ledger, LedgerError, SyncReconciler};
use lucky_store::{FileStore, KeyValueStore, StoreError, WinRecordStore};

use crate::config::GameConfig;

/// Anything that stops the server from coming up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Prize table: {0}")]
    Prizes(#[from] CoreError),

    #[error("Store: {0}")]
    Store(#[from] StoreError),

    #[error("Ledger: {0}")]
    Ledger(#[from] LedgerError),
}

/// A running engine and the prize table it draws from.
pub struct Engine {
    pub service: DrawService,
    pub prizes: Arc<PrizeTable>,
}

/// The configured prize table, or the built-in one.
pub fn load_prize_table(config: &GameConfig) -> Result<PrizeTable, CoreError> {
    let table = match &config.prize_table_path {
        Some(path) => {
            let table = PrizeTable::load(path)?;
            tracing::info!(path = %path.display(), prizes = table.len(), "Prize table loaded");
            table
        }
        None => PrizeTable::default(),
    };

    let residual = table.residual_probability();
    if residual > 0.0 {
        tracing::info!(residual, "Unclaimed probability falls to the last prize");
    }
    if table.total_probability() > 1.0 + f64::EPSILON {
        tracing::warn!(
            total = table.total_probability(),
            "Prize probabilities sum above 1, trailing prizes are partly unreachable"
        );
    }

    Ok(table)
}

/// HTTP ledger when a URL is configured, otherwise a disabled one.
pub fn build_ledger(config: &GameConfig) -> Result<Arc<dyn Ledger>, LedgerError> {
    match &config.ledger_url {
        Some(url) => {
            tracing::info!(url = %url, "Ledger sync enabled");
            Ok(Arc::new(HttpLedger::new(url.clone(), config.ledger_timeout())?))
        }
        None => {
            tracing::info!("No LEDGER_URL set, wins stay unsynced");
            Ok(Arc::new(DisabledLedger))
        }
    }
}

/// Start the engine with the file store, configured ledger and system clock.
pub fn start_engine(config: &GameConfig) -> Result<Engine, StartupError> {
    let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(config.store_path.clone())?);
    tracing::info!(path = %config.store_path.display(), "Key-value store opened");

    let ledger = build_ledger(config)?;
    start_engine_with(config, kv, ledger, Arc::new(SystemClock))
}

/// Start the engine on caller-supplied storage, ledger and clock.
///
/// Must be called inside a Tokio runtime.
pub fn start_engine_with(
    config: &GameConfig,
    kv: Arc<dyn KeyValueStore>,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
) -> Result<Engine, StartupError> {
    let prizes = Arc::new(load_prize_table(config)?);
    let store = WinRecordStore::load(kv);
    let (reconciler, outcomes) = SyncReconciler::new(ledger);

    let orchestrator = DrawOrchestrator::new(
        Arc::clone(&prizes),
        config.window_policy(),
        store,
        reconciler,
    )
    .with_clock(clock)
    .with_reset_ttl(config.reset_ttl());

    let service = DrawService::start(orchestrator, outcomes, config.service_config());

    Ok(Engine { service, prizes })
}
