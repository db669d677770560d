// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::labels::{PaymentMethod, TaxDocument};
use crate::phase::BUSINESS_TIMEZONE;
use crate::status::{FulfillmentStatus, PaymentStatus};
use crate::types::{Material, MaterialKind, Order, Product};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Builds a UTC instant from a Santiago local wall-clock time.
pub fn santiago(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> DateTime<Utc> {
    BUSINESS_TIMEZONE
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn create_test_order(customer_id: i64, delivery_at: DateTime<Utc>) -> Order {
    Order {
        order_id: None,
        order_number: String::from("V000001"),
        customer_id,
        delivery_at,
        delivery_address: String::from("Av. Vitacura 2900"),
        comuna: Some(String::from("Vitacura")),
        arrangement_price: 25_000,
        delivery_price: 5_000,
        fulfillment: FulfillmentStatus::ThisWeekPlan,
        payment: PaymentStatus::Pending,
        payment_method: PaymentMethod::Pendiente,
        tax_document: TaxDocument::NotIssued,
        document_number: None,
        photo_url: None,
        is_event: false,
        event_type: None,
        reason: None,
        payment_due_date: NaiveDate::from_ymd_opt(2025, 3, 18).unwrap(),
        created_at: santiago(2025, 3, 3, 10, 0),
        dispatched_at: None,
        archived_at: None,
        cancelled_at: None,
        paid_at: None,
    }
}

pub fn create_test_material(name: &str, on_hand: i64) -> Material {
    let mut material: Material =
        Material::new(MaterialKind::Flower, name.to_string(), on_hand, 10, 800);
    material.material_id = Some(1);
    material
}

pub fn create_test_product(name: &str) -> Product {
    let mut product: Product = Product::new(name.to_string(), String::from("Ramos"), 25_000);
    product.product_id = Some(1);
    product
}
