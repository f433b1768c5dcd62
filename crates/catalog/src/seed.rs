//! Demo catalog contents.

use chrono::NaiveDate;

use medimart_core::{IdGenerator, Money};

use crate::CatalogItem;

/// Category labels offered by the inventory editor.
pub const CATEGORIES: [&str; 7] = [
    "Analgesics",
    "Antibiotics",
    "Antidiabetics",
    "Cardiovascular",
    "Supplements",
    "Dermatological",
    "Gastrointestinal",
];

struct SeedRow {
    name: &'static str,
    category: &'static str,
    batch: &'static str,
    mfg: (i32, u32, u32),
    expiry: (i32, u32, u32),
    stock: u32,
    wholesale: i64,
    retail: i64,
}

const ROWS: [SeedRow; 5] = [
    SeedRow {
        name: "Paracetamol 500mg",
        category: "Analgesics",
        batch: "BT-0012",
        mfg: (2023, 10, 1),
        expiry: (2025, 10, 1),
        stock: 500,
        wholesale: 12,
        retail: 20,
    },
    SeedRow {
        name: "Amoxicillin 250mg",
        category: "Antibiotics",
        batch: "BT-0055",
        mfg: (2023, 11, 15),
        expiry: (2025, 5, 15),
        stock: 200,
        wholesale: 45,
        retail: 70,
    },
    SeedRow {
        name: "Vitamin C 500mg",
        category: "Supplements",
        batch: "BT-0099",
        mfg: (2024, 1, 10),
        expiry: (2026, 1, 10),
        stock: 1000,
        wholesale: 8,
        retail: 15,
    },
    SeedRow {
        name: "Metformin 500mg",
        category: "Antidiabetics",
        batch: "BT-0120",
        mfg: (2023, 9, 20),
        expiry: (2025, 9, 20),
        stock: 350,
        wholesale: 18,
        retail: 30,
    },
    SeedRow {
        name: "Atorvastatin 10mg",
        category: "Cardiovascular",
        batch: "BT-0201",
        mfg: (2023, 12, 1),
        expiry: (2025, 12, 1),
        stock: 15,
        wholesale: 25,
        retail: 45,
    },
];

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// The five seeded items, with fresh identifiers from `ids`.
pub fn demo_items(ids: &dyn IdGenerator) -> Vec<CatalogItem> {
    ROWS.iter()
        .map(|row| CatalogItem {
            id: ids.next_item_id(),
            name: row.name.to_string(),
            category: row.category.to_string(),
            batch_number: row.batch.to_string(),
            mfg_date: date(row.mfg),
            expiry_date: date(row.expiry),
            stock_quantity: row.stock,
            wholesale_price: Money::from_units(row.wholesale),
            retail_price: Money::from_units(row.retail),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medimart_core::SequentialIdGenerator;

    #[test]
    fn seed_items_are_valid_and_categorised() {
        let items = demo_items(&SequentialIdGenerator::new());
        assert_eq!(items.len(), 5);
        for item in &items {
            item.validate().unwrap();
            assert!(CATEGORIES.contains(&item.category.as_str()));
        }
        assert_eq!(items.iter().filter(|i| i.is_low_stock()).count(), 1);
    }
}
