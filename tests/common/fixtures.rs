//! Test fixtures for integration tests.

#![allow(dead_code)]

use mongodb::bson::{Bson, Document, doc};

/// Customers with uneven field coverage and a mix of scalar and nested values.
pub fn customers() -> Vec<Document> {
    (0..120)
        .map(|i| {
            let mut d = doc! {
                "name": format!("Customer {}", i),
                "tier": (["gold", "silver", "bronze"][i % 3]),
                "age": 20 + (i % 40) as i32,
            };
            if i % 2 == 0 {
                d.insert("email", format!("c{}@example.com", i));
            }
            if i % 10 == 0 {
                d.insert("referrer", Bson::Null);
            }
            if i % 4 == 0 {
                d.insert("address", doc! { "city": "Oslo", "zip": format!("{:04}", i) });
            } else {
                d.insert("address", "unknown");
            }
            d
        })
        .collect()
}

/// Small product catalog for search and export.
pub fn products() -> Vec<Document> {
    vec![
        doc! { "_id": 1, "sku": "A-1", "name": "Apple", "price": 1.5, "tags": ["fruit"] },
        doc! { "_id": 2, "sku": "B-2", "name": "Banana", "price": 0.5, "tags": ["fruit"] },
        doc! { "_id": 3, "sku": "C-3", "name": "Carrot", "price": 0.8 },
        doc! { "_id": 4, "sku": "D-4", "name": "Dates", "price": 4.0 },
        doc! { "_id": 5, "sku": "E-5", "name": "apricot", "price": 2.25 },
    ]
}
