// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{MaterialRef, Product, RecipeEntry};
use std::collections::BTreeMap;

/// Expands a product recipe into total material requirements.
///
/// Returns a mapping from material reference to `multiplier` times the
/// recipe quantity.
///
/// # Errors
///
/// Returns `DomainError::RecipeEmpty` when the product has no recipe
/// entries, `DomainError::RecipeDuplicate` when two entries share a
/// material reference, and `DomainError::Validation` for a non-positive
/// multiplier or entry quantity.
pub fn resolve_recipe(
    product: &Product,
    entries: &[RecipeEntry],
    multiplier: i64,
) -> Result<BTreeMap<MaterialRef, i64>, DomainError> {
    if multiplier <= 0 {
        return Err(DomainError::Validation {
            field: "multiplier",
            reason: format!("must be positive, got {multiplier}"),
        });
    }
    if entries.is_empty() {
        return Err(DomainError::RecipeEmpty {
            product: product.name.clone(),
        });
    }
    let mut required: BTreeMap<MaterialRef, i64> = BTreeMap::new();
    for entry in entries {
        if entry.quantity <= 0 {
            return Err(DomainError::Validation {
                field: "recipe_quantity",
                reason: format!(
                    "material {} of product '{}' has non-positive quantity {}",
                    entry.material, product.name, entry.quantity
                ),
            });
        }
        if required
            .insert(entry.material, entry.quantity * multiplier)
            .is_some()
        {
            return Err(DomainError::RecipeDuplicate {
                product: product.name.clone(),
                material: entry.material.to_string(),
            });
        }
    }
    Ok(required)
}
