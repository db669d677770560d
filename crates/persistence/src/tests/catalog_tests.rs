// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use violeta::Command;
use violeta_domain::{
    DomainError, Material, MaterialKind, MaterialRef, Product, RecipeEntry,
};

use crate::error::PersistenceError;
use crate::mutations::PersistedOrder;
use crate::tests::helpers::{
    apply_command, create_order, create_test_intake, new_store, santiago, seed_customer,
    seed_product, seed_rose,
};
use crate::Persistence;

#[test]
fn test_material_round_trips_through_the_store() {
    let mut store: Persistence = new_store();

    let vase: Material = Material::new(
        MaterialKind::Container,
        String::from("Florero de vidrio"),
        8,
        3,
        4_500,
    );
    let vase_id: i64 = store.create_material(&vase).unwrap();

    let loaded: Material = store
        .get_material(MaterialRef::new(MaterialKind::Container, vase_id))
        .unwrap();
    assert_eq!(loaded.kind, MaterialKind::Container);
    assert_eq!(loaded.name, "Florero de vidrio");
    assert_eq!(loaded.on_hand, 8);
    assert_eq!(loaded.reserved_for_event, 0);
}

#[test]
fn test_restock_adds_to_on_hand() {
    let mut store: Persistence = new_store();
    let rose: MaterialRef = seed_rose(&mut store, 20);

    store.restock_material(rose, 30).unwrap();

    assert_eq!(store.get_material(rose).unwrap().on_hand, 50);
}

#[test]
fn test_restock_rejects_non_positive_quantity() {
    let mut store: Persistence = new_store();
    let rose: MaterialRef = seed_rose(&mut store, 20);

    let result: Result<(), PersistenceError> = store.restock_material(rose, 0);

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::Validation { .. }))
    ));
}

#[test]
fn test_delete_material_refused_while_live_order_references_it() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );

    let result: Result<(), PersistenceError> = store.delete_material(rose);

    assert!(matches!(
        result,
        Err(PersistenceError::StillReferenced {
            entity: "material",
            ..
        })
    ));
}

#[test]
fn test_delete_material_allowed_once_orders_are_cancelled() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    let persisted: PersistedOrder = create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );
    apply_command(
        &mut store,
        persisted.order_id,
        Command::Cancel {
            reason: String::from("cliente canceló"),
        },
        santiago(2025, 3, 4, 10, 0),
    );

    store.delete_material(rose).unwrap();

    assert!(matches!(
        store.get_material(rose),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_low_stock_report_covers_both_kinds() {
    let mut store: Persistence = new_store();
    seed_rose(&mut store, 10);
    store
        .create_material(&Material::new(
            MaterialKind::Flower,
            String::from("Lirio blanco"),
            50,
            10,
            1_200,
        ))
        .unwrap();
    store
        .create_material(&Material::new(
            MaterialKind::Container,
            String::from("Canasto mimbre"),
            2,
            5,
            6_000,
        ))
        .unwrap();

    let low: Vec<Material> = store.list_low_stock().unwrap();

    let names: Vec<&str> = low.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Rosa roja", "Canasto mimbre"]);
}

#[test]
fn test_find_material_by_name() {
    let mut store: Persistence = new_store();
    let rose: MaterialRef = seed_rose(&mut store, 20);

    let found: Option<Material> = store
        .find_material_by_name(MaterialKind::Flower, "Rosa roja")
        .unwrap();
    assert_eq!(found.unwrap().material_id, Some(rose.id));

    let missing: Option<Material> = store
        .find_material_by_name(MaterialKind::Flower, "Orquídea")
        .unwrap();
    assert!(missing.is_none());
}

#[test]
fn test_set_recipe_rejects_duplicate_material() {
    let mut store: Persistence = new_store();
    let rose: MaterialRef = seed_rose(&mut store, 20);
    let product_id: i64 = store
        .create_product(&Product::new(
            String::from("Ramo clásico"),
            String::from("Ramos"),
            25_000,
        ))
        .unwrap();

    let entries: Vec<RecipeEntry> = vec![
        RecipeEntry {
            product_id,
            material: rose,
            quantity: 12,
        },
        RecipeEntry {
            product_id,
            material: rose,
            quantity: 6,
        },
    ];
    let result: Result<(), PersistenceError> = store.set_recipe(product_id, &entries);

    assert!(matches!(
        result,
        Err(PersistenceError::Domain(DomainError::RecipeDuplicate { .. }))
    ));
}

#[test]
fn test_set_recipe_replaces_previous_entries() {
    let mut store: Persistence = new_store();
    let rose: MaterialRef = seed_rose(&mut store, 20);
    let product_id: i64 = seed_product(&mut store, rose);

    let replacement: Vec<RecipeEntry> = vec![RecipeEntry {
        product_id,
        material: rose,
        quantity: 6,
    }];
    store.set_recipe(product_id, &replacement).unwrap();

    let recipe: Vec<RecipeEntry> = store.get_recipe(product_id).unwrap();
    assert_eq!(recipe.len(), 1);
    assert_eq!(recipe[0].quantity, 6);
}

#[test]
fn test_deactivated_product_drops_out_of_active_list() {
    let mut store: Persistence = new_store();
    let rose: MaterialRef = seed_rose(&mut store, 20);
    let product_id: i64 = seed_product(&mut store, rose);

    let mut product: Product = store.get_product(product_id).unwrap();
    product.is_active = false;
    store.update_product(&product).unwrap();

    assert!(store.list_products(true).unwrap().is_empty());
    assert_eq!(store.list_products(false).unwrap().len(), 1);
}

#[test]
fn test_delete_customer_refused_while_orders_exist() {
    let mut store: Persistence = new_store();
    let customer_id: i64 = seed_customer(&mut store);
    let rose: MaterialRef = seed_rose(&mut store, 50);
    let product_id: i64 = seed_product(&mut store, rose);

    create_order(
        &mut store,
        customer_id,
        product_id,
        create_test_intake(customer_id, santiago(2025, 3, 5, 11, 0)),
        santiago(2025, 3, 3, 9, 0),
    );

    let result: Result<(), PersistenceError> = store.delete_customer(customer_id);

    assert!(matches!(
        result,
        Err(PersistenceError::StillReferenced {
            entity: "customer",
            ..
        })
    ));
}
