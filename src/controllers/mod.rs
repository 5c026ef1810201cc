//! Controladores del gateway
//!
//! Orquestan cliente, cache y servicios puros para cada área del dashboard.

pub mod alert_controller;
pub mod dashboard_controller;
pub mod directory_controller;
pub mod equipment_controller;
pub mod rental_controller;
pub mod usage_controller;

use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::warn;

use crate::cache::{Identified, SnapshotSlot};
use crate::clients::Batch;
use crate::dto::api_response::ListResponse;
use crate::utils::errors::AppResult;

/// Colección obtenida del backend o, si no responde, del último snapshot
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub items: Vec<T>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub stale: bool,
    /// Elementos del backend descartados por no pasar la frontera de parseo
    pub skipped: usize,
}

impl<T> Fetched<T> {
    /// Listado derivado con los mismos metadatos de obtención
    pub fn respond_with<U>(&self, items: Vec<U>) -> ListResponse<U> {
        ListResponse::new(items, self.stale, self.fetched_at).with_skipped(self.skipped)
    }
}

/// Trae una colección; ante fallo de transporte sirve el snapshot (o vacío)
pub async fn fetch_or_cached<T, F>(
    slot: &SnapshotSlot<T>,
    now: DateTime<Utc>,
    fetch: F,
) -> AppResult<Fetched<T>>
where
    T: Clone + Identified,
    F: Future<Output = AppResult<Batch<T>>>,
{
    match fetch.await {
        Ok(batch) => {
            slot.store(batch.items.clone(), now).await;
            Ok(Fetched {
                items: batch.items,
                fetched_at: Some(now),
                stale: false,
                skipped: batch.skipped,
            })
        }
        Err(e) if e.is_transport() => {
            warn!("⚠️ Backend no disponible, sirviendo último snapshot: {}", e);
            Ok(match slot.get().await {
                Some(snapshot) => Fetched {
                    items: snapshot.items,
                    fetched_at: Some(snapshot.fetched_at),
                    stale: true,
                    skipped: 0,
                },
                None => Fetched {
                    items: Vec::new(),
                    fetched_at: None,
                    stale: true,
                    skipped: 0,
                },
            })
        }
        Err(e) => Err(e),
    }
}

/// Trae una entidad; ante fallo de transporte usa la copia cacheada si existe
pub async fn fetch_one_or_cached<T, F>(slot: &SnapshotSlot<T>, id: i64, fetch: F) -> AppResult<T>
where
    T: Clone + Identified,
    F: Future<Output = AppResult<T>>,
{
    match fetch.await {
        Ok(item) => Ok(item),
        Err(e) if e.is_transport() => match slot.find(id).await {
            Some(item) => {
                warn!("⚠️ Backend no disponible, sirviendo copia cacheada de {}", id);
                Ok(item)
            }
            None => Err(e),
        },
        Err(e) => Err(e),
    }
}
