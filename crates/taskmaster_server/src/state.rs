//! Shared application state and the blocking-store bridge.
//!
//! # Invariants
//! - Store work never runs on an async worker thread; it goes through
//!   [`AppState::with_store`], which checks out one pooled connection per call.
//! - Pool and worker failures surface as `StoreUnavailable`.

use log::{debug, error};
use rusqlite::Connection;
use std::sync::Arc;
use std::time::Instant;
use taskmaster_core::db::DbPool;
use taskmaster_core::{CredentialHasher, ServiceError, ServiceResult};

#[derive(Clone)]
pub struct AppState {
    pool: DbPool,
    hasher: Arc<CredentialHasher>,
}

impl AppState {
    pub fn new(pool: DbPool, hasher: CredentialHasher) -> Self {
        Self {
            pool,
            hasher: Arc::new(hasher),
        }
    }

    /// Runs `op` on the blocking pool with a pooled connection.
    ///
    /// `name` only labels the log event.
    pub async fn with_store<T, F>(&self, name: &'static str, op: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &CredentialHasher) -> ServiceResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let hasher = Arc::clone(&self.hasher);
        let started_at = Instant::now();

        let joined = tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(|err| {
                error!(
                    "event=store_call module=server status=error op={} error_code=pool_unavailable error={}",
                    name, err
                );
                ServiceError::StoreUnavailable(err.to_string())
            })?;
            op(&conn, &hasher)
        })
        .await;

        let result = match joined {
            Ok(result) => result,
            Err(err) => {
                error!(
                    "event=store_call module=server status=error op={} error_code=worker_failed error={}",
                    name, err
                );
                Err(ServiceError::StoreUnavailable(err.to_string()))
            }
        };

        debug!(
            "event=store_call module=server op={} status={} duration_ms={}",
            name,
            match &result {
                Ok(_) => "ok",
                Err(err) => err.code(),
            },
            started_at.elapsed().as_millis()
        );
        result
    }
}
