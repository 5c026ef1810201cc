//! Cache del último snapshot conocido
//!
//! Guarda la última colección confirmada por el backend para servirla
//! marcada como obsoleta cuando el backend no responde. Solo se escribe
//! después de un fetch o una mutación confirmados.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{Alert, Equipment, Operator, Rental, Site};

/// Entidades con id de superficie
pub trait Identified {
    fn surface_id(&self) -> i64;
}

macro_rules! identified {
    ($($model:ty),*) => {
        $(impl Identified for $model {
            fn surface_id(&self) -> i64 {
                self.id
            }
        })*
    };
}

identified!(Equipment, Site, Operator, Rental, Alert);

/// Colección cacheada con su instante de obtención
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub items: Vec<T>,
    pub fetched_at: DateTime<Utc>,
}

/// Una colección del cache
#[derive(Debug)]
pub struct SnapshotSlot<T> {
    name: &'static str,
    inner: Arc<RwLock<Option<Snapshot<T>>>>,
}

impl<T> Clone for SnapshotSlot<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Identified> SnapshotSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get(&self) -> Option<Snapshot<T>> {
        self.inner.read().await.clone()
    }

    /// Reemplaza la colección completa
    pub async fn store(&self, items: Vec<T>, fetched_at: DateTime<Utc>) {
        debug!("💾 Snapshot de {} actualizado ({} elementos)", self.name, items.len());
        *self.inner.write().await = Some(Snapshot { items, fetched_at });
    }

    /// Refleja una mutación confirmada; sin snapshot previo no hace nada
    pub async fn upsert(&self, item: T) {
        let mut guard = self.inner.write().await;
        if let Some(snapshot) = guard.as_mut() {
            match snapshot
                .items
                .iter_mut()
                .find(|existing| existing.surface_id() == item.surface_id())
            {
                Some(existing) => *existing = item,
                None => snapshot.items.push(item),
            }
        }
    }

    pub async fn find(&self, id: i64) -> Option<T> {
        self.inner
            .read()
            .await
            .as_ref()
            .and_then(|snapshot| {
                snapshot
                    .items
                    .iter()
                    .find(|item| item.surface_id() == id)
                    .cloned()
            })
    }
}

/// Cache compartido por todos los controladores
#[derive(Debug, Clone)]
pub struct SnapshotCache {
    pub equipment: SnapshotSlot<Equipment>,
    pub sites: SnapshotSlot<Site>,
    pub operators: SnapshotSlot<Operator>,
    pub rentals: SnapshotSlot<Rental>,
    pub alerts: SnapshotSlot<Alert>,
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self {
            equipment: SnapshotSlot::new("equipment"),
            sites: SnapshotSlot::new("sites"),
            operators: SnapshotSlot::new("operators"),
            rentals: SnapshotSlot::new("rentals"),
            alerts: SnapshotSlot::new("alerts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resolution;
    use chrono::TimeZone;

    fn alert(id: i64, title: &str) -> Alert {
        Alert {
            id,
            equipment_id: None,
            rental_id: None,
            alert_type: "overdue".to_string(),
            title: title.to_string(),
            message: String::new(),
            severity_label: "high".to_string(),
            resolution: Resolution::Unresolved,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_store_and_upsert() {
        let cache = SnapshotCache::new();
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        // sin snapshot previo, upsert no inventa una colección
        cache.alerts.upsert(alert(1, "first")).await;
        assert!(cache.alerts.get().await.is_none());

        cache.alerts.store(vec![alert(1, "first"), alert(2, "second")], at).await;
        cache.alerts.upsert(alert(2, "second v2")).await;
        cache.alerts.upsert(alert(3, "third")).await;

        let snapshot = cache.alerts.get().await.unwrap();
        assert_eq!(snapshot.fetched_at, at);
        assert_eq!(snapshot.items.len(), 3);
        assert_eq!(cache.alerts.find(2).await.unwrap().title, "second v2");
        assert!(cache.alerts.find(9).await.is_none());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let cache = SnapshotCache::new();
        let clone = cache.clone();
        clone.alerts.store(vec![alert(1, "shared")], Utc::now()).await;
        assert_eq!(cache.alerts.get().await.unwrap().items.len(), 1);
    }
}
