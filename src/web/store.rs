//! In-memory reading store.

use crate::web::models::{NewReading, ReadingStats, StoredReading, TimeRange};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Readings keyed by id. Contents live as long as the process.
#[derive(Debug, Default)]
pub struct ReadingStore {
    readings: RwLock<HashMap<Uuid, StoredReading>>,
}

impl ReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading and return it with its id and timestamp.
    pub async fn insert(&self, reading: NewReading) -> StoredReading {
        let stored = StoredReading::from_new(reading, Utc::now());
        self.readings
            .write()
            .await
            .insert(stored.id, stored.clone());
        stored
    }

    pub async fn get(&self, id: Uuid) -> Option<StoredReading> {
        self.readings.read().await.get(&id).cloned()
    }

    /// Remove a reading, returning whether it existed.
    pub async fn delete(&self, id: Uuid) -> bool {
        self.readings.write().await.remove(&id).is_some()
    }

    /// Readings inside `range`, oldest first.
    pub async fn list(&self, range: TimeRange) -> Vec<StoredReading> {
        let mut readings: Vec<StoredReading> = self
            .readings
            .read()
            .await
            .values()
            .filter(|reading| range.contains(reading.timestamp))
            .cloned()
            .collect();
        readings.sort_by_key(|reading| reading.timestamp);
        readings
    }

    pub async fn stats(&self, range: TimeRange) -> ReadingStats {
        let readings = self.list(range).await;
        ReadingStats::from_readings(&readings, range)
    }

    pub async fn len(&self) -> usize {
        self.readings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
