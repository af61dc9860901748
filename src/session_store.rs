use async_trait::async_trait;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tower_sessions::{
    ExpiredDeletion, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store::Error as SSError,
};

/// Session records kept in process memory. Enough for a hand-off slot that only lives between two page loads.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    records: Arc<Mutex<HashMap<Id, Record>>>,
}

impl MemorySessionStore {
    fn records(&self) -> MutexGuard<'_, HashMap<Id, Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_live(record: &Record) -> bool {
        record.expiry_date > OffsetDateTime::now_utc()
    }

    /// Sweeps expired records every `period` until the process stops.
    pub async fn sweep_expired_every(self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            if let Err(e) = self.delete_expired().await {
                error!(?e, "Error deleting expired sessions");
            }
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records().len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session_record: &mut Record) -> Result<(), SSError> {
        let mut records = self.records();
        while records.contains_key(&session_record.id) {
            session_record.id = Id::default();
        }
        records.insert(session_record.id, session_record.clone());
        Ok(())
    }

    async fn save(&self, session_record: &Record) -> Result<(), SSError> {
        self.records()
            .insert(session_record.id, session_record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> Result<Option<Record>, SSError> {
        Ok(self
            .records()
            .get(session_id)
            .filter(|record| Self::is_live(record))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> Result<(), SSError> {
        self.records().remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> Result<(), SSError> {
        let mut records = self.records();
        let before = records.len();
        records.retain(|_, record| Self::is_live(record));
        let swept = before - records.len();
        if swept > 0 {
            debug!(swept, "deleted expired sessions");
        }
        Ok(())
    }
}
