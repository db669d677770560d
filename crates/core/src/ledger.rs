// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Inventory ledger operations.
//!
//! All mutations of `on_hand` and `reserved_for_event` go through these
//! functions. They operate on in-memory rows; the caller persists the
//! mutated rows inside the enclosing transaction.

use violeta_domain::{DomainError, Material, MaterialRef, validate_quantity};

/// Overdraw policy for stock consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverdrawPolicy {
    /// Refuse to take on-hand stock below zero.
    Strict,
    /// Permit negative on-hand as an operational override. The caller must
    /// record an audit entry for the override.
    AllowOverdraw,
}

/// Holds stock for an event order.
///
/// # Errors
///
/// Returns `DomainError::InsufficientStock` when the unreserved on-hand
/// stock does not cover the quantity.
pub fn reserve(material: &mut Material, quantity: i64) -> Result<(), DomainError> {
    validate_quantity("quantity", quantity)?;
    let available: i64 = material.on_hand - material.reserved_for_event;
    if available < quantity {
        return Err(DomainError::InsufficientStock {
            material: material.name.clone(),
            requested: quantity,
            available,
        });
    }
    material.reserved_for_event += quantity;
    Ok(())
}

/// Releases a hold placed by [`reserve`].
///
/// A release larger than the reservation clamps at zero and is reported
/// with a warning; it never fails the caller.
pub fn release(material: &mut Material, quantity: i64) {
    if quantity <= 0 {
        return;
    }
    if quantity > material.reserved_for_event {
        let underflow: DomainError = DomainError::ReservationUnderflow {
            material: material.name.clone(),
            requested: quantity,
            reserved: material.reserved_for_event,
        };
        tracing::warn!("{underflow}");
        material.reserved_for_event = 0;
    } else {
        material.reserved_for_event -= quantity;
    }
}

/// Takes stock out of on-hand inventory.
///
/// # Errors
///
/// Under [`OverdrawPolicy::Strict`], returns
/// `DomainError::InsufficientStock` when on-hand stock does not cover the
/// quantity.
pub fn consume(
    material: &mut Material,
    quantity: i64,
    policy: OverdrawPolicy,
) -> Result<(), DomainError> {
    validate_quantity("quantity", quantity)?;
    if policy == OverdrawPolicy::Strict && material.on_hand < quantity {
        return Err(DomainError::InsufficientStock {
            material: material.name.clone(),
            requested: quantity,
            available: material.on_hand,
        });
    }
    material.on_hand -= quantity;
    Ok(())
}

/// Returns stock to on-hand inventory.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a non-positive quantity.
pub fn restock(material: &mut Material, quantity: i64) -> Result<(), DomainError> {
    validate_quantity("quantity", quantity)?;
    material.on_hand += quantity;
    Ok(())
}

/// Finds a material row by its compound reference.
///
/// # Errors
///
/// Returns `DomainError::NotFound` when no row matches.
pub fn find_material_mut<'a>(
    materials: &'a mut [Material],
    reference: MaterialRef,
) -> Result<&'a mut Material, DomainError> {
    materials
        .iter_mut()
        .find(|m| m.kind == reference.kind && m.material_id == Some(reference.id))
        .ok_or(DomainError::NotFound {
            entity: "material",
            id: reference.to_string(),
        })
}
