// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog management mutations: materials, products, recipes, customers.

use diesel::prelude::*;
use diesel::SqliteConnection;
use violeta_domain::{
    Customer, DomainError, Material, MaterialKind, MaterialRef, Product, RecipeEntry,
    validate_customer_fields, validate_material_fields, validate_product_fields,
    validate_quantity,
};

use crate::data_models::{ContainerRecord, CustomerRecord, FlowerRecord, NewRecipeRow, ProductRecord};
use crate::diesel_schema::{containers, customers, flowers, order_materials, orders, product_recipes, products};
use crate::error::PersistenceError;
use crate::sqlite::get_last_insert_rowid;

/// Creates a material in its kind table.
///
/// # Errors
///
/// Returns an error if validation or the insert fails.
pub fn create_material(
    conn: &mut SqliteConnection,
    material: &Material,
) -> Result<i64, PersistenceError> {
    validate_material_fields(material)?;
    match material.kind {
        MaterialKind::Flower => {
            diesel::insert_into(flowers::table)
                .values(FlowerRecord::from_domain(material))
                .execute(conn)?;
        }
        MaterialKind::Container => {
            diesel::insert_into(containers::table)
                .values(ContainerRecord::from_domain(material))
                .execute(conn)?;
        }
    }
    get_last_insert_rowid(conn)
}

/// Updates a material's attributes and counters.
///
/// # Errors
///
/// Returns an error if the material has no id, validation fails, or the
/// update fails.
pub fn update_material(
    conn: &mut SqliteConnection,
    material: &Material,
) -> Result<(), PersistenceError> {
    let material_id: i64 = material.material_id.ok_or_else(|| {
        PersistenceError::NotFound(format!("material '{}' has no id", material.name))
    })?;
    if material.name.trim().is_empty() {
        return Err(DomainError::Validation {
            field: "name",
            reason: String::from("must not be empty"),
        }
        .into());
    }
    let updated: usize = match material.kind {
        MaterialKind::Flower => diesel::update(flowers::table.find(material_id))
            .set(FlowerRecord::from_domain(material))
            .execute(conn)?,
        MaterialKind::Container => diesel::update(containers::table.find(material_id))
            .set(ContainerRecord::from_domain(material))
            .execute(conn)?,
    };
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "material {}:{material_id}",
            material.kind
        )));
    }
    Ok(())
}

/// Adds stock to a material.
///
/// # Errors
///
/// Returns an error for a non-positive quantity or a missing material.
pub fn restock_material(
    conn: &mut SqliteConnection,
    reference: MaterialRef,
    quantity: i64,
) -> Result<(), PersistenceError> {
    validate_quantity("quantity", quantity)?;
    let updated: usize = match reference.kind {
        MaterialKind::Flower => diesel::update(flowers::table.find(reference.id))
            .set(flowers::on_hand.eq(flowers::on_hand + quantity))
            .execute(conn)?,
        MaterialKind::Container => diesel::update(containers::table.find(reference.id))
            .set(containers::on_hand.eq(containers::on_hand + quantity))
            .execute(conn)?,
    };
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("material {reference}")));
    }
    Ok(())
}

/// Deletes a material unless a non-terminal order still references it.
///
/// # Errors
///
/// Returns `PersistenceError::StillReferenced` when a live order needs
/// the material.
pub fn delete_material(
    conn: &mut SqliteConnection,
    reference: MaterialRef,
) -> Result<(), PersistenceError> {
    let live_references: i64 = order_materials::table
        .inner_join(orders::table)
        .filter(order_materials::material_kind.eq(reference.kind.as_str()))
        .filter(order_materials::material_id.eq(reference.id))
        .filter(orders::fulfillment_status.ne_all(vec!["archived", "cancelled"]))
        .count()
        .get_result(conn)?;
    if live_references > 0 {
        return Err(PersistenceError::StillReferenced {
            entity: "material",
            id: reference.id,
        });
    }
    match reference.kind {
        MaterialKind::Flower => {
            diesel::delete(flowers::table.find(reference.id)).execute(conn)?;
        }
        MaterialKind::Container => {
            diesel::delete(containers::table.find(reference.id)).execute(conn)?;
        }
    }
    Ok(())
}

/// Creates a product.
///
/// # Errors
///
/// Returns an error if validation or the insert fails.
pub fn create_product(
    conn: &mut SqliteConnection,
    product: &Product,
) -> Result<i64, PersistenceError> {
    validate_product_fields(product)?;
    diesel::insert_into(products::table)
        .values(ProductRecord::from_domain(product))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Updates a product. Deactivation goes through here; products referenced
/// by orders are never hard-deleted.
///
/// # Errors
///
/// Returns an error if the product has no id, validation fails, or the
/// update fails.
pub fn update_product(
    conn: &mut SqliteConnection,
    product: &Product,
) -> Result<(), PersistenceError> {
    let product_id: i64 = product.product_id.ok_or_else(|| {
        PersistenceError::NotFound(format!("product '{}' has no id", product.name))
    })?;
    validate_product_fields(product)?;
    let updated: usize = diesel::update(products::table.find(product_id))
        .set(ProductRecord::from_domain(product))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("product {product_id}")));
    }
    Ok(())
}

/// Replaces a product's recipe with a new set of entries.
///
/// # Errors
///
/// Returns `DomainError::RecipeDuplicate` for duplicate material keys and
/// `DomainError::Validation` for non-positive quantities.
pub fn set_recipe(
    conn: &mut SqliteConnection,
    product_id: i64,
    entries: &[RecipeEntry],
) -> Result<(), PersistenceError> {
    conn.transaction::<(), PersistenceError, _>(|conn| {
        let product_name: String = products::table
            .find(product_id)
            .select(products::name)
            .first(conn)?;
        let mut seen: std::collections::BTreeSet<MaterialRef> = std::collections::BTreeSet::new();
        for entry in entries {
            validate_quantity("quantity", entry.quantity)?;
            if !seen.insert(entry.material) {
                return Err(DomainError::RecipeDuplicate {
                    product: product_name.clone(),
                    material: entry.material.to_string(),
                }
                .into());
            }
        }
        diesel::delete(product_recipes::table.filter(product_recipes::product_id.eq(product_id)))
            .execute(conn)?;
        for entry in entries {
            let row: NewRecipeRow = NewRecipeRow {
                product_id,
                ..NewRecipeRow::from_domain(entry)
            };
            diesel::insert_into(product_recipes::table)
                .values(row)
                .execute(conn)?;
        }
        Ok(())
    })
}

/// Creates a customer.
///
/// # Errors
///
/// Returns an error if validation or the insert fails.
pub fn create_customer(
    conn: &mut SqliteConnection,
    customer: &Customer,
) -> Result<i64, PersistenceError> {
    validate_customer_fields(customer)?;
    diesel::insert_into(customers::table)
        .values(CustomerRecord::from_domain(customer))
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Updates a customer's attributes (not the cached totals).
///
/// # Errors
///
/// Returns an error if the customer has no id, validation fails, or the
/// update fails.
pub fn update_customer(
    conn: &mut SqliteConnection,
    customer: &Customer,
) -> Result<(), PersistenceError> {
    let customer_id: i64 = customer.customer_id.ok_or_else(|| {
        PersistenceError::NotFound(format!("customer '{}' has no id", customer.name))
    })?;
    validate_customer_fields(customer)?;
    let updated: usize = diesel::update(customers::table.find(customer_id))
        .set(CustomerRecord::from_domain(customer))
        .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "customer {customer_id}"
        )));
    }
    Ok(())
}

/// Deletes a customer unless any order references them.
///
/// # Errors
///
/// Returns `PersistenceError::StillReferenced` when the customer has
/// orders.
pub fn delete_customer(
    conn: &mut SqliteConnection,
    customer_id: i64,
) -> Result<(), PersistenceError> {
    let order_count: i64 = orders::table
        .filter(orders::customer_id.eq(customer_id))
        .count()
        .get_result(conn)?;
    if order_count > 0 {
        return Err(PersistenceError::StillReferenced {
            entity: "customer",
            id: customer_id,
        });
    }
    diesel::delete(customers::table.find(customer_id)).execute(conn)?;
    Ok(())
}
