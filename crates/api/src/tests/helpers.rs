// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use chrono::{DateTime, TimeZone, Utc};
use violeta_audit::ClientContext;
use violeta_domain::{
    BUSINESS_TIMEZONE, CreditClass, Customer, Material, MaterialKind, MaterialRef, Product,
    RecipeEntry,
};
use violeta_persistence::Persistence;

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::CreateOrderRequest;

pub fn new_store() -> Persistence {
    Persistence::new_in_memory().expect("in-memory store")
}

pub fn santiago(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    BUSINESS_TIMEZONE
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
        .with_timezone(&Utc)
}

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor {
        user_id: 1,
        display_name: String::from("Valentina"),
        role: Role::Admin,
    }
}

pub fn secretary() -> AuthenticatedActor {
    AuthenticatedActor {
        user_id: 2,
        display_name: String::from("Carmen"),
        role: Role::Secretary,
    }
}

pub fn workshop() -> AuthenticatedActor {
    AuthenticatedActor {
        user_id: 3,
        display_name: String::from("Alonso"),
        role: Role::Workshop,
    }
}

pub fn test_client() -> ClientContext {
    ClientContext::new(
        Some(String::from("192.168.1.10")),
        Some(String::from("violeta-test")),
    )
}

pub fn seed_customer(store: &mut Persistence) -> i64 {
    let customer: Customer = Customer::new(
        String::from("María José"),
        String::from("+56 9 1234 5678"),
        CreditClass::Fiel,
    );
    store.create_customer(&customer).expect("seed customer")
}

pub fn seed_rose(store: &mut Persistence, on_hand: i64) -> MaterialRef {
    let material: Material = Material::new(
        MaterialKind::Flower,
        String::from("Rosa roja"),
        on_hand,
        10,
        800,
    );
    let material_id: i64 = store.create_material(&material).expect("seed rose");
    MaterialRef::new(MaterialKind::Flower, material_id)
}

pub fn seed_product(store: &mut Persistence, rose: MaterialRef) -> i64 {
    let product: Product =
        Product::new(String::from("Ramo clásico"), String::from("Ramos"), 25_000);
    let product_id: i64 = store.create_product(&product).expect("seed product");
    let recipe: Vec<RecipeEntry> = vec![RecipeEntry {
        product_id,
        material: rose,
        quantity: 12,
    }];
    store.set_recipe(product_id, &recipe).expect("seed recipe");
    product_id
}

/// Intake request for the standard test order: delivery on the afternoon
/// of 2025-03-05, priced 25.000 + 5.000.
pub fn intake_request(customer_id: i64, product_id: i64) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_id,
        product_id,
        quantity: 1,
        delivery_at: String::from("2025-03-05 14:00"),
        delivery_address: String::from("Av. Vitacura 2900"),
        comuna: Some(String::from("Vitacura")),
        arrangement_price: 25_000,
        delivery_price: Some(5_000),
        payment_method: String::from("Pendiente"),
        tax_document: String::from("Falta boleta o factura"),
        photo_url: None,
        is_event: false,
        event_type: None,
    }
}
