use serde::{Deserialize, Serialize};

use super::lenient;
use crate::repositories::Record;

/// A stock line in the storeroom (magazzino).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u64,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    /// Measurement unit, e.g. "kg", "l", "pz".
    #[serde(deserialize_with = "lenient::text")]
    pub unit: String,
    /// May go negative; no floor is enforced.
    #[serde(
        default,
        serialize_with = "super::serialize_quantity",
        deserialize_with = "lenient::number"
    )]
    pub quantity: f64,
}

impl InventoryItem {
    pub fn new(id: u64, name: String, unit: String, quantity: f64) -> Self {
        Self {
            id,
            name,
            unit,
            quantity,
        }
    }

    /// Applies a signed stock movement.
    pub fn adjust(&mut self, delta: f64) {
        self.quantity += delta;
    }
}

impl Record for InventoryItem {
    fn id(&self) -> u64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn adjust_allows_negative_stock() {
        let mut item = InventoryItem::new(1, "Flour".into(), "kg".into(), 2.0);
        item.adjust(-5.0);
        assert_eq!(item.quantity, -3.0);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"id": 1, "name": "Flour", "unit": "kg", "quantity": -3})
        );
    }

    #[test]
    fn stored_quantity_text_is_read_as_a_number() {
        let item: InventoryItem = serde_json::from_value(
            json!({"id": 3, "name": "Sale", "unit": "kg", "quantity": "2.5"}),
        )
        .unwrap();
        assert_eq!(item.quantity, 2.5);
    }

    #[test]
    fn fractional_quantity_round_trips() {
        let item = InventoryItem::new(2, "Olive oil".into(), "l".into(), 1.5);
        let text = serde_json::to_string(&item).unwrap();
        let back: InventoryItem = serde_json::from_str(&text).unwrap();
        assert_eq!(back, item);
    }
}
