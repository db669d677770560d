// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, TimeZone, Utc};
use violeta::{Command, OrderContext, OrderIntake, apply};
use violeta_audit::{Actor, ClientContext};
use violeta_domain::{
    BUSINESS_TIMEZONE, CreditClass, Customer, Material, MaterialKind, MaterialRef, PaymentMethod,
    Product, RecipeEntry, TaxDocument,
};

use crate::mutations::PersistedOrder;
use crate::Persistence;

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

pub fn create_test_actor() -> Actor {
    Actor::user(1, String::from("Valentina"))
}

pub fn create_test_client() -> ClientContext {
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

pub fn create_test_intake(customer_id: i64, delivery_at: DateTime<Utc>) -> OrderIntake {
    OrderIntake {
        customer_id,
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

/// Loads an intake context from the store, applies `CreateOrder`, and
/// persists the result the way the API layer does.
pub fn create_order(
    store: &mut Persistence,
    customer_id: i64,
    product_id: i64,
    intake: OrderIntake,
    now: DateTime<Utc>,
) -> PersistedOrder {
    let customer: Customer = store.get_customer(customer_id).expect("customer");
    let product: Product = store.get_product(product_id).expect("product");
    let recipe: Vec<RecipeEntry> = store.get_recipe(product_id).expect("recipe");
    let references: Vec<MaterialRef> = recipe.iter().map(|entry| entry.material).collect();
    let materials: Vec<Material> = store.get_materials(&references).expect("materials");
    let context: OrderContext = OrderContext::for_intake(customer, product, recipe, materials, now);
    let result = apply(
        &context,
        Command::CreateOrder { intake },
        create_test_actor(),
        create_test_client(),
    )
    .expect("create order");
    let persisted: PersistedOrder = store.persist_transition(&result).expect("persist");
    store.append_audit(&result.audit).expect("audit");
    persisted
}

/// Loads an order context from the store, applies a command, and persists
/// the result.
pub fn apply_command(
    store: &mut Persistence,
    order_id: i64,
    command: Command,
    now: DateTime<Utc>,
) -> PersistedOrder {
    let order = store.get_order(order_id).expect("order");
    let customer: Customer = store.get_customer(order.customer_id).expect("customer");
    let order_materials = store.get_order_materials(order_id).expect("order materials");
    let references: Vec<MaterialRef> = order_materials.iter().map(|row| row.material).collect();
    let materials: Vec<Material> = store.get_materials(&references).expect("materials");
    let context: OrderContext =
        OrderContext::for_order(customer, order, order_materials, materials, now);
    let result = apply(&context, command, create_test_actor(), create_test_client())
        .expect("apply command");
    let persisted: PersistedOrder = store.persist_transition(&result).expect("persist");
    store.append_audit(&result.audit).expect("audit");
    persisted
}
