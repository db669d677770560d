// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Customer, Material, Order, Product};

/// Validates a quantity used in inventory and recipe operations.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the quantity is not positive.
pub fn validate_quantity(field: &'static str, quantity: i64) -> Result<(), DomainError> {
    if quantity > 0 {
        Ok(())
    } else {
        Err(DomainError::Validation {
            field,
            reason: format!("must be positive, got {quantity}"),
        })
    }
}

/// Validates the intrinsic fields of an order before persistence.
///
/// # Errors
///
/// Returns `DomainError::Validation` on the first failing field.
pub fn validate_order_fields(order: &Order) -> Result<(), DomainError> {
    if order.delivery_address.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "delivery_address",
            reason: String::from("must not be empty"),
        });
    }
    if order.arrangement_price < 0 {
        return Err(DomainError::Validation {
            field: "arrangement_price",
            reason: format!("must not be negative, got {}", order.arrangement_price),
        });
    }
    if order.delivery_price < 0 {
        return Err(DomainError::Validation {
            field: "delivery_price",
            reason: format!("must not be negative, got {}", order.delivery_price),
        });
    }
    if order.is_event && order.event_type.as_deref().is_none_or(str::is_empty) {
        return Err(DomainError::Validation {
            field: "event_type",
            reason: String::from("required for event orders"),
        });
    }
    if order.tax_document.is_issued() && order.document_number.as_deref().is_none_or(str::is_empty)
    {
        return Err(DomainError::Validation {
            field: "document_number",
            reason: String::from("required once a tax document is issued"),
        });
    }
    Ok(())
}

/// Validates the intrinsic fields of a material.
///
/// # Errors
///
/// Returns `DomainError::Validation` on the first failing field.
pub fn validate_material_fields(material: &Material) -> Result<(), DomainError> {
    if material.name.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "name",
            reason: String::from("must not be empty"),
        });
    }
    if material.on_hand < 0 {
        return Err(DomainError::Validation {
            field: "on_hand",
            reason: format!("must not be negative at creation, got {}", material.on_hand),
        });
    }
    if material.reserved_for_event < 0 {
        return Err(DomainError::Validation {
            field: "reserved_for_event",
            reason: format!(
                "must not be negative, got {}",
                material.reserved_for_event
            ),
        });
    }
    if material.unit_cost < 0 {
        return Err(DomainError::Validation {
            field: "unit_cost",
            reason: format!("must not be negative, got {}", material.unit_cost),
        });
    }
    Ok(())
}

/// Validates the intrinsic fields of a product.
///
/// # Errors
///
/// Returns `DomainError::Validation` on the first failing field.
pub fn validate_product_fields(product: &Product) -> Result<(), DomainError> {
    if product.name.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "name",
            reason: String::from("must not be empty"),
        });
    }
    if product.base_price < 0 {
        return Err(DomainError::Validation {
            field: "base_price",
            reason: format!("must not be negative, got {}", product.base_price),
        });
    }
    Ok(())
}

/// Validates the intrinsic fields of a customer.
///
/// # Errors
///
/// Returns `DomainError::Validation` on the first failing field.
pub fn validate_customer_fields(customer: &Customer) -> Result<(), DomainError> {
    if customer.name.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "name",
            reason: String::from("must not be empty"),
        });
    }
    Ok(())
}
