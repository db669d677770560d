// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog reads: materials, products, recipes.

use diesel::prelude::*;
use diesel::SqliteConnection;
use violeta_domain::{Material, MaterialKind, MaterialRef, Product, RecipeEntry};

use crate::data_models::{MaterialRow, ProductRow, RecipeRow};
use crate::diesel_schema::{containers, flowers, product_recipes, products};
use crate::error::PersistenceError;

/// Loads one material by reference.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for a missing material.
pub fn get_material(
    conn: &mut SqliteConnection,
    reference: MaterialRef,
) -> Result<Material, PersistenceError> {
    let row: Option<MaterialRow> = match reference.kind {
        MaterialKind::Flower => flowers::table
            .find(reference.id)
            .first::<MaterialRow>(conn)
            .optional()?,
        MaterialKind::Container => containers::table
            .find(reference.id)
            .first::<MaterialRow>(conn)
            .optional()?,
    };
    row.map(|r| r.into_domain(reference.kind))
        .ok_or_else(|| PersistenceError::NotFound(format!("material {reference}")))
}

/// Loads a set of materials by reference, in the order given.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for the first missing material.
pub fn get_materials(
    conn: &mut SqliteConnection,
    references: &[MaterialRef],
) -> Result<Vec<Material>, PersistenceError> {
    references
        .iter()
        .map(|reference| get_material(conn, *reference))
        .collect()
}

/// Finds a material of one kind by exact name. Used by the stock import.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_material_by_name(
    conn: &mut SqliteConnection,
    kind: MaterialKind,
    name: &str,
) -> Result<Option<Material>, PersistenceError> {
    let row: Option<MaterialRow> = match kind {
        MaterialKind::Flower => flowers::table
            .filter(flowers::name.eq(name))
            .first::<MaterialRow>(conn)
            .optional()?,
        MaterialKind::Container => containers::table
            .filter(containers::name.eq(name))
            .first::<MaterialRow>(conn)
            .optional()?,
    };
    Ok(row.map(|r| r.into_domain(kind)))
}

/// Lists every material of one kind, alphabetically.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_materials(
    conn: &mut SqliteConnection,
    kind: MaterialKind,
) -> Result<Vec<Material>, PersistenceError> {
    let rows: Vec<MaterialRow> = match kind {
        MaterialKind::Flower => flowers::table.order(flowers::name.asc()).load(conn)?,
        MaterialKind::Container => containers::table.order(containers::name.asc()).load(conn)?,
    };
    Ok(rows.into_iter().map(|r| r.into_domain(kind)).collect())
}

/// Lists every material at or below its low-stock threshold, flowers
/// first.
///
/// # Errors
///
/// Returns an error if either query fails.
pub fn list_low_stock(conn: &mut SqliteConnection) -> Result<Vec<Material>, PersistenceError> {
    let low_flowers: Vec<MaterialRow> = flowers::table
        .filter(flowers::on_hand.le(flowers::low_stock_threshold))
        .order(flowers::name.asc())
        .load(conn)?;
    let low_containers: Vec<MaterialRow> = containers::table
        .filter(containers::on_hand.le(containers::low_stock_threshold))
        .order(containers::name.asc())
        .load(conn)?;
    Ok(low_flowers
        .into_iter()
        .map(|r| r.into_domain(MaterialKind::Flower))
        .chain(
            low_containers
                .into_iter()
                .map(|r| r.into_domain(MaterialKind::Container)),
        )
        .collect())
}

/// Loads one product by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` for a missing product.
pub fn get_product(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Product, PersistenceError> {
    let row: ProductRow = products::table
        .find(product_id)
        .first::<ProductRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("product {product_id}")))?;
    Ok(row.into_domain())
}

/// Lists products, optionally restricted to active ones.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_products(
    conn: &mut SqliteConnection,
    only_active: bool,
) -> Result<Vec<Product>, PersistenceError> {
    let mut query = products::table.order(products::name.asc()).into_boxed();
    if only_active {
        query = query.filter(products::is_active.eq(1));
    }
    let rows: Vec<ProductRow> = query.load(conn)?;
    Ok(rows.into_iter().map(ProductRow::into_domain).collect())
}

/// Loads a product's recipe entries.
///
/// # Errors
///
/// Returns an error if the query fails or a row fails to map back.
pub fn get_recipe(
    conn: &mut SqliteConnection,
    product_id: i64,
) -> Result<Vec<RecipeEntry>, PersistenceError> {
    product_recipes::table
        .filter(product_recipes::product_id.eq(product_id))
        .order(product_recipes::recipe_id.asc())
        .load::<RecipeRow>(conn)?
        .into_iter()
        .map(RecipeRow::try_into_domain)
        .collect()
}
