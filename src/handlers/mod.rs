pub mod common;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod pages;

pub use health::health_router;
pub use inventory::inventory_router;
pub use orders::orders_router;
pub use pages::pages_router;
