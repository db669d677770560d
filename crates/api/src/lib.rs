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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

//! Operation boundary layer for the Violeta back office.
//!
//! Handlers are framework-free functions over the persistence adapter:
//! authorize, load context, apply the command through the engine, persist
//! the transition, append the audit record. The HTTP surface lives in the
//! server crate.

mod auth;
mod csv_import;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    cancel_order, create_customer, create_material, create_order, create_product, create_user,
    delete_customer, delete_material, dispatch_order, edit_order_materials, get_customer_details,
    get_order_details, get_product_details, import_stock, list_customer_orders, list_customers,
    list_materials, list_orders, list_products, list_users, login, low_stock_report, mark_paid,
    preview_stock_import, query_audit_log, repair, restock_material, set_product_recipe,
    set_tax_document, set_user_active, sweep_orders, update_customer, update_material,
    update_product,
};
pub use request_response::{
    AuditQueryRequest, AuditRecordInfo, CancelOrderRequest, CreateMaterialRequest,
    CreateOrderRequest, CreateProductRequest, CreateUserRequest, CustomerInfo, CustomerRequest,
    DispatchOrderRequest, EditMaterialsRequest, LoginRequest, LoginResponse, MarkPaidRequest,
    MaterialInfo, OrderInfo, OrderMaterialInfo, ProductDetailInfo, ProductInfo, RecipeEntryInfo,
    RepairResponse, RestockRequest, SetRecipeRequest, SetTaxDocumentRequest, SetUserActiveRequest,
    StockImportResponse, StockImportRowInfo, SweepMoveInfo, SweepResponse, UpdateMaterialRequest,
    UpdateProductRequest, UserInfo,
};
