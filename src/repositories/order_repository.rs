use std::path::Path;

use crate::models::Order;

use super::{Collection, JsonFileBackend};

/// File name of the orders collection inside the data directory.
pub const ORDERS_FILE: &str = "orders.json";

/// Repository for order operations
pub type OrderRepository = Collection<Order>;

/// Opens the orders collection backed by `<data_dir>/orders.json`.
pub fn open_orders(data_dir: &Path) -> OrderRepository {
    Collection::open("orders", JsonFileBackend::new(data_dir.join(ORDERS_FILE)))
}

impl Collection<Order> {
    /// Replaces the free-form status. `None` clears it.
    pub async fn set_status(&self, id: u64, status: Option<String>) -> Option<Order> {
        self.update(id, |order| order.status = status).await
    }

    /// Marks the order paid or unpaid at the cash desk.
    pub async fn set_paid(&self, id: u64, paid: bool) -> Option<Order> {
        self.update(id, |order| order.paid = paid).await
    }
}
