//! Persisted collections.
//!
//! A [`Collection`] holds every record of one type in memory, keyed by an integer id, and
//! writes the whole sequence back to its [`Persistence`] backend after each mutation.
//! Backend failures are logged and swallowed: the in-memory state keeps serving even when
//! the disk no longer matches it.

use tokio::sync::Mutex;
use tracing::{error, info};

mod backend;
pub mod inventory_repository;
pub mod order_repository;

pub use backend::{InMemoryBackend, JsonFileBackend, Persistence, StoreError, EMPTY_COLLECTION};
pub use inventory_repository::InventoryRepository;
pub use order_repository::OrderRepository;

/// A record stored in a [`Collection`].
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> u64;
}

/// Next id for a freshly loaded sequence: 1 when empty, otherwise the highest id plus one.
pub fn next_id<T: Record>(records: &[T]) -> u64 {
    records.iter().map(Record::id).max().map_or(1, |max| max + 1)
}

struct CollectionState<T> {
    records: Vec<T>,
    next_id: u64,
}

pub struct Collection<T: Record> {
    name: &'static str,
    backend: Box<dyn Persistence<T>>,
    state: Mutex<CollectionState<T>>,
}

impl<T: Record> Collection<T> {
    /// Loads the backend contents. A store that cannot be read, or is not a JSON array,
    /// starts the collection empty; the id counter is derived here once and never re-scanned.
    pub fn open<B>(name: &'static str, backend: B) -> Self
    where
        B: Persistence<T> + 'static,
    {
        let records = match backend.load() {
            Ok(records) => records,
            Err(err) => {
                error!(
                    collection = name,
                    location = %backend.location(),
                    error = %err,
                    "Failed to load collection, starting empty"
                );
                Vec::new()
            }
        };
        let next_id = next_id(&records);
        info!(
            collection = name,
            location = %backend.location(),
            records = records.len(),
            next_id,
            "Collection loaded"
        );

        Self {
            name,
            backend: Box::new(backend),
            state: Mutex::new(CollectionState { records, next_id }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Snapshot of all records in insertion order.
    pub async fn list(&self) -> Vec<T> {
        self.state.lock().await.records.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Id the next appended record will receive.
    pub async fn peek_next_id(&self) -> u64 {
        self.state.lock().await.next_id
    }

    pub async fn find(&self, id: u64) -> Option<T> {
        self.state
            .lock()
            .await
            .records
            .iter()
            .find(|record| record.id() == id)
            .cloned()
    }

    /// Builds a record with the next id, appends it and persists the collection.
    pub async fn append_with<F>(&self, build: F) -> T
    where
        F: FnOnce(u64) -> T,
    {
        let mut state = self.state.lock().await;
        let id = state.next_id;
        state.next_id += 1;

        let record = build(id);
        debug_assert_eq!(record.id(), id, "record must carry the assigned id");
        state.records.push(record.clone());
        self.persist(&state.records);
        record
    }

    /// Applies `mutate` to the record with `id` and persists. Unknown ids change nothing.
    pub async fn update<F>(&self, id: u64, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.state.lock().await;
        let record = state.records.iter_mut().find(|record| record.id() == id)?;
        mutate(record);
        let updated = record.clone();
        self.persist(&state.records);
        Some(updated)
    }

    fn persist(&self, records: &[T]) {
        if let Err(err) = self.backend.persist(records) {
            error!(
                collection = self.name,
                location = %self.backend.location(),
                error = %err,
                "Failed to persist collection; continuing from memory"
            );
        }
    }
}
