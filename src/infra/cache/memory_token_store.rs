use crate::domain::ports::ResetTokenStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    user_id: String,
    expires_at: Instant,
}

/// Process-local TTL cache. Expired entries read as absent and are purged on access.
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, AppError> {
        self.entries.lock().map_err(|_| AppError::InternalWithMsg("token store lock poisoned".into()))
    }
}

#[async_trait]
impl ResetTokenStore for MemoryTokenStore {
    async fn put(&self, key: &str, user_id: &str, ttl: Duration) -> Result<(), AppError> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(key.to_string(), Entry { user_id: user_id.to_string(), expires_at: now + ttl });
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let mut entries = self.lock()?;
        let lookup = entries.get(key).map(|e| (e.expires_at > Instant::now(), e.user_id.clone()));
        match lookup {
            Some((true, user_id)) => Ok(Some(user_id)),
            Some((false, _)) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_remove() {
        let store = MemoryTokenStore::new();
        store.put("password_reset_abc", "user-1", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("password_reset_abc").await.unwrap().as_deref(), Some("user-1"));

        store.remove("password_reset_abc").await.unwrap();
        assert_eq!(store.get("password_reset_abc").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let store = MemoryTokenStore::new();
        store.put("k", "user-1", Duration::from_millis(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryTokenStore::new();
        store.put("k", "user-1", Duration::from_secs(60)).await.unwrap();
        store.put("k", "user-2", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("user-2"));
    }
}
