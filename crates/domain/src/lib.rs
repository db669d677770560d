// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod billing;
mod config;
mod error;
mod labels;
mod phase;
mod recipe;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use billing::{compute_customer_totals, due_date};
pub use config::{BusinessConfig, ComunaPrice, OriginPoint};
pub use error::DomainError;
pub use labels::{CreditClass, DayOfWeek, PaymentMethod, TaxDocument};
pub use phase::{
    BUSINESS_TIMEZONE, add_days, business_date, is_past_delivery, parse_delivery_datetime, phase_of,
};
pub use recipe::resolve_recipe;
pub use status::{FulfillmentStatus, PaymentStatus};
pub use types::{
    Customer, Material, MaterialKind, MaterialRef, MaterialRole, Order, OrderMaterial, Product,
    RecipeEntry,
};
pub use validation::{
    validate_customer_fields, validate_material_fields, validate_order_fields,
    validate_product_fields, validate_quantity,
};
