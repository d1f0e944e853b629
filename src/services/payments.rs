use crate::error::{FightersError, Result};
use crate::models::{PaymentRecord, PAYMENT_COLLECTION};
use async_trait::async_trait;
use moka::future::Cache;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;

/// Persisted client payments. Records are insert-only and unique by both
/// `address` and `block`.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn insert(&self, record: PaymentRecord) -> Result<()>;

    async fn find_by_address(&self, address: &str) -> Result<Option<PaymentRecord>>;

    async fn find_by_block(&self, block: u64) -> Result<Option<PaymentRecord>>;
}

fn duplicate_address(record: &PaymentRecord) -> FightersError {
    FightersError::DuplicatePayment {
        field: "address",
        value: record.address.clone(),
    }
}

fn duplicate_block(record: &PaymentRecord) -> FightersError {
    FightersError::DuplicatePayment {
        field: "block",
        value: record.block.to_string(),
    }
}

#[derive(Default)]
struct MemoryIndexes {
    by_address: HashMap<String, PaymentRecord>,
    by_block: HashMap<u64, String>,
}

#[derive(Default)]
pub struct MemoryPaymentStore {
    inner: RwLock<MemoryIndexes>,
}

impl MemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_address.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn insert(&self, record: PaymentRecord) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.by_address.contains_key(&record.address) {
            return Err(duplicate_address(&record));
        }
        if inner.by_block.contains_key(&record.block) {
            return Err(duplicate_block(&record));
        }

        inner.by_block.insert(record.block, record.address.clone());
        inner.by_address.insert(record.address.clone(), record);
        Ok(())
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<PaymentRecord>> {
        Ok(self.inner.read().await.by_address.get(address).cloned())
    }

    async fn find_by_block(&self, block: u64) -> Result<Option<PaymentRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_block
            .get(&block)
            .and_then(|address| inner.by_address.get(address))
            .cloned())
    }
}

// KEYS[1] address index, KEYS[2] block index, ARGV[1] record.
// Returns 0 when stored, 1 or 2 naming the index that already exists.
const INSERT_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then return 1 end
if redis.call('EXISTS', KEYS[2]) == 1 then return 2 end
redis.call('SET', KEYS[1], ARGV[1])
redis.call('SET', KEYS[2], ARGV[1])
return 0
"#;

pub fn address_key(address: &str) -> String {
    format!("{}:address:{}", PAYMENT_COLLECTION, address)
}

pub fn block_key(block: u64) -> String {
    format!("{}:block:{}", PAYMENT_COLLECTION, block)
}

pub struct RedisPaymentStore {
    redis: redis::aio::ConnectionManager,
    insert: redis::Script,
    memory: Cache<String, PaymentRecord>,
}

impl RedisPaymentStore {
    pub async fn new(redis_url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let redis = client.get_connection_manager().await?;
        tracing::info!("Redis connected successfully");

        let memory = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(60))
            .build();

        Ok(Self {
            redis,
            insert: redis::Script::new(INSERT_SCRIPT),
            memory,
        })
    }

    async fn get(&self, key: String) -> Result<Option<PaymentRecord>> {
        if let Some(cached) = self.memory.get(&key).await {
            tracing::debug!("Memory cache hit for key: {}", key);
            return Ok(Some(cached));
        }

        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(&key).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        let record: PaymentRecord = serde_json::from_str(&raw)?;
        self.memory.insert(key, record.clone()).await;
        Ok(Some(record))
    }
}

#[async_trait]
impl PaymentStore for RedisPaymentStore {
    async fn insert(&self, record: PaymentRecord) -> Result<()> {
        let serialized = serde_json::to_string(&record)?;
        let mut redis = self.redis.clone();

        let outcome: i64 = self
            .insert
            .key(address_key(&record.address))
            .key(block_key(record.block))
            .arg(serialized)
            .invoke_async(&mut redis)
            .await?;

        match outcome {
            0 => {
                tracing::info!(
                    "Payment recorded: {} from {} at block {}",
                    record.quantity,
                    record.address,
                    record.block
                );
                Ok(())
            }
            1 => Err(duplicate_address(&record)),
            2 => Err(duplicate_block(&record)),
            other => Err(FightersError::StoreError(format!(
                "unexpected insert outcome {}",
                other
            ))),
        }
    }

    async fn find_by_address(&self, address: &str) -> Result<Option<PaymentRecord>> {
        self.get(address_key(address)).await
    }

    async fn find_by_block(&self, block: u64) -> Result<Option<PaymentRecord>> {
        self.get(block_key(block)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn payment(address: &str, block: u64) -> PaymentRecord {
        PaymentRecord {
            address: address.to_string(),
            block,
            quantity: 0.02,
            checking_from_func: 1,
        }
    }

    async fn exercise_uniqueness(store: &dyn PaymentStore) {
        assert_ok!(store.insert(payment("0xaaa", 100)).await);

        let same_address = store.insert(payment("0xaaa", 101)).await;
        assert!(matches!(
            assert_err!(same_address),
            FightersError::DuplicatePayment { field: "address", .. }
        ));

        let same_block = store.insert(payment("0xbbb", 100)).await;
        assert!(matches!(
            assert_err!(same_block),
            FightersError::DuplicatePayment { field: "block", .. }
        ));

        // Rejected inserts leave nothing behind
        assert!(store.find_by_address("0xbbb").await.unwrap().is_none());
        assert!(store.find_by_block(101).await.unwrap().is_none());

        let stored = store.find_by_block(100).await.unwrap().unwrap();
        assert_eq!(stored, payment("0xaaa", 100));
    }

    #[tokio::test]
    async fn memory_store_enforces_unique_address_and_block() {
        let store = MemoryPaymentStore::new();
        exercise_uniqueness(&store).await;
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn memory_store_keeps_counter_verbatim() {
        let store = MemoryPaymentStore::new();
        let mut record = payment("0xccc", 7);
        record.checking_from_func = -3;
        store.insert(record.clone()).await.unwrap();

        let found = store.find_by_address("0xccc").await.unwrap().unwrap();
        assert_eq!(found.checking_from_func, -3);
    }

    #[test]
    fn index_keys_are_namespaced_by_collection() {
        assert_eq!(address_key("0xabc"), "ClientPayment:address:0xabc");
        assert_eq!(block_key(12), "ClientPayment:block:12");
    }

    #[tokio::test]
    #[ignore = "needs a running Redis at REDIS_URL"]
    async fn redis_store_enforces_unique_address_and_block() {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let store = RedisPaymentStore::new(&url).await.unwrap();
        let mut redis = store.redis.clone();
        let _: () = redis
            .del(&[address_key("0xaaa"), address_key("0xbbb"), block_key(100), block_key(101)])
            .await
            .unwrap();

        exercise_uniqueness(&store).await;
    }
}
