use std::path::Path;

use crate::models::InventoryItem;

use super::{Collection, JsonFileBackend};

/// File name of the inventory collection inside the data directory.
pub const INVENTORY_FILE: &str = "inventory.json";

pub type InventoryRepository = Collection<InventoryItem>;

/// Opens the inventory collection backed by `<data_dir>/inventory.json`.
pub fn open_inventory(data_dir: &Path) -> InventoryRepository {
    Collection::open(
        "inventory",
        JsonFileBackend::new(data_dir.join(INVENTORY_FILE)),
    )
}

impl Collection<InventoryItem> {
    /// Adds a signed delta to the stock quantity. Stock may go negative.
    pub async fn adjust_quantity(&self, id: u64, delta: f64) -> Option<InventoryItem> {
        self.update(id, |item| item.adjust(delta)).await
    }
}
