// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::labels::{CreditClass, TaxDocument};
use crate::tests::helpers::{create_test_material, create_test_order, santiago};
use crate::types::{Customer, Material, Order, Product};
use crate::validation::{
    validate_customer_fields, validate_material_fields, validate_order_fields,
    validate_product_fields, validate_quantity,
};

#[test]
fn test_quantity_must_be_positive() {
    assert!(validate_quantity("quantity", 1).is_ok());
    assert!(validate_quantity("quantity", 0).is_err());
    assert!(validate_quantity("quantity", -5).is_err());
}

#[test]
fn test_order_requires_delivery_address() {
    let mut order: Order = create_test_order(1, santiago(2025, 3, 5, 14, 0));
    order.delivery_address = String::from("   ");

    let result: Result<(), DomainError> = validate_order_fields(&order);

    assert!(matches!(
        result,
        Err(DomainError::Validation {
            field: "delivery_address",
            ..
        })
    ));
}

#[test]
fn test_order_prices_must_not_be_negative() {
    let mut order: Order = create_test_order(1, santiago(2025, 3, 5, 14, 0));
    order.arrangement_price = -1;

    assert!(validate_order_fields(&order).is_err());

    order.arrangement_price = 25_000;
    order.delivery_price = -1;

    assert!(validate_order_fields(&order).is_err());
}

#[test]
fn test_zero_priced_order_is_valid() {
    let mut order: Order = create_test_order(1, santiago(2025, 3, 5, 14, 0));
    order.arrangement_price = 0;
    order.delivery_price = 0;

    assert!(validate_order_fields(&order).is_ok());
}

#[test]
fn test_event_order_requires_event_type() {
    let mut order: Order = create_test_order(1, santiago(2025, 3, 5, 14, 0));
    order.is_event = true;
    order.event_type = None;

    assert!(validate_order_fields(&order).is_err());

    order.event_type = Some(String::from("matrimonio"));

    assert!(validate_order_fields(&order).is_ok());
}

#[test]
fn test_issued_document_requires_number() {
    let mut order: Order = create_test_order(1, santiago(2025, 3, 5, 14, 0));
    order.tax_document = TaxDocument::ReceiptIssued;
    order.document_number = None;

    assert!(validate_order_fields(&order).is_err());

    order.document_number = Some(String::from("B-10422"));

    assert!(validate_order_fields(&order).is_ok());
}

#[test]
fn test_material_counters_must_not_be_negative() {
    let mut material: Material = create_test_material("Rosa roja", 50);

    assert!(validate_material_fields(&material).is_ok());

    material.on_hand = -1;

    assert!(validate_material_fields(&material).is_err());
}

#[test]
fn test_product_requires_name_and_non_negative_price() {
    let mut product: Product = Product::new(String::new(), String::from("Ramos"), 25_000);

    assert!(validate_product_fields(&product).is_err());

    product.name = String::from("Ramo clásico");
    product.base_price = -100;

    assert!(validate_product_fields(&product).is_err());

    product.base_price = 0;

    assert!(validate_product_fields(&product).is_ok());
}

#[test]
fn test_customer_requires_name() {
    let customer: Customer =
        Customer::new(String::new(), String::from("+56 9 1234 5678"), CreditClass::Nuevo);

    assert!(validate_customer_fields(&customer).is_err());
}
