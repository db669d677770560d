// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, TimeZone, Utc};
use violeta_audit::{Actor, ClientContext};
use violeta_domain::{
    BUSINESS_TIMEZONE, CreditClass, Customer, Material, MaterialKind, MaterialRef, PaymentMethod,
    Product, RecipeEntry, TaxDocument,
};

use crate::command::OrderIntake;
use crate::state::OrderContext;

pub fn santiago(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    BUSINESS_TIMEZONE
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn rose_ref() -> MaterialRef {
    MaterialRef::new(MaterialKind::Flower, 1)
}

pub fn create_test_customer() -> Customer {
    let mut customer: Customer = Customer::new(
        String::from("María José"),
        String::from("+56 9 1234 5678"),
        CreditClass::Fiel,
    );
    customer.customer_id = Some(1);
    customer
}

pub fn create_test_product() -> (Product, Vec<RecipeEntry>) {
    let mut product: Product =
        Product::new(String::from("Ramo clásico"), String::from("Ramos"), 25_000);
    product.product_id = Some(1);
    let recipe: Vec<RecipeEntry> = vec![RecipeEntry {
        product_id: 1,
        material: rose_ref(),
        quantity: 12,
    }];
    (product, recipe)
}

pub fn create_test_rose(on_hand: i64) -> Material {
    let mut material: Material = Material::new(
        MaterialKind::Flower,
        String::from("Rosa roja"),
        on_hand,
        10,
        800,
    );
    material.material_id = Some(1);
    material
}

pub fn create_test_intake(delivery_at: DateTime<Utc>) -> OrderIntake {
    OrderIntake {
        customer_id: 1,
        quantity: 1,
        delivery_at,
        delivery_address: String::from("Av. Vitacura 2900"),
        comuna: Some(String::from("Vitacura")),
        arrangement_price: 25_000,
        delivery_price: 5_000,
        payment_method: PaymentMethod::Pendiente,
        tax_document: TaxDocument::NotIssued,
        photo_url: None,
        is_event: false,
        event_type: None,
    }
}

pub fn create_intake_context(on_hand: i64, now: DateTime<Utc>) -> OrderContext {
    let (product, recipe) = create_test_product();
    OrderContext::for_intake(
        create_test_customer(),
        product,
        recipe,
        vec![create_test_rose(on_hand)],
        now,
    )
}

pub fn create_test_actor() -> Actor {
    Actor::user(1, String::from("Valentina"))
}

pub fn create_test_client() -> ClientContext {
    ClientContext::new(
        Some(String::from("192.168.1.10")),
        Some(String::from("violeta-test")),
    )
}
