// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Api handler functions for state-changing and read-only operations.
//!
//! Every state-changing handler follows the same shape: authorize the
//! actor, load the context the command needs, apply the command through
//! the engine, persist the transition, and append the audit record. Audit
//! failures are logged and swallowed so they never fail the business
//! operation.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::warn;
use violeta::{
    Command, OrderContext, OrderIntake, OverdrawPolicy, PlannedTransition, TransitionResult, apply,
    plan_sweep,
};
use violeta_audit::{Actor, AuditAction, AuditFilter, AuditRecord, ClientContext, EntityKind};
use violeta_domain::{
    BusinessConfig, CreditClass, Customer, DomainError, FulfillmentStatus, Material, MaterialKind,
    MaterialRef, MaterialRole, Order, OrderMaterial, PaymentMethod, Product, RecipeEntry,
    TaxDocument, parse_delivery_datetime,
};
use violeta_persistence::{PersistedOrder, Persistence, RepairReport, UserData};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::csv_import::{StockRow, parse_stock_csv};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AuditQueryRequest, AuditRecordInfo, CancelOrderRequest, CreateMaterialRequest,
    CreateOrderRequest, CreateProductRequest, CreateUserRequest, CustomerInfo, CustomerRequest,
    DispatchOrderRequest, EditMaterialsRequest, LoginRequest, LoginResponse, MarkPaidRequest,
    MaterialInfo, OrderInfo, ProductDetailInfo, ProductInfo, RecipeEntryInfo, RepairResponse,
    RestockRequest, SetRecipeRequest, SetTaxDocumentRequest, SetUserActiveRequest,
    StockImportResponse, StockImportRowInfo, SweepMoveInfo, SweepResponse, UpdateMaterialRequest,
    UpdateProductRequest, UserInfo,
};

/// Default low-stock threshold for materials created by a stock import.
const IMPORT_LOW_STOCK_THRESHOLD: i64 = 0;

/// Appends an audit record, logging and swallowing any failure.
///
/// The audit log must never fail the business operation that produced the
/// record.
fn record_audit(store: &mut Persistence, record: &AuditRecord) {
    if let Err(e) = store.append_audit(record) {
        warn!("Failed to append '{}' audit record: {e}", record.action);
    }
}

/// Maps a material kind to its audit entity kind.
const fn material_entity_kind(kind: MaterialKind) -> EntityKind {
    match kind {
        MaterialKind::Flower => EntityKind::Flower,
        MaterialKind::Container => EntityKind::Container,
    }
}

/// Loads the context a command against an existing order needs.
///
/// Materials are loaded for the order's current rows plus any extra
/// references the command is about to touch.
fn load_order_context(
    store: &mut Persistence,
    order_id: i64,
    extra_refs: &[MaterialRef],
    now: DateTime<Utc>,
) -> Result<OrderContext, ApiError> {
    let order: Order = store.get_order(order_id).map_err(translate_persistence_error)?;
    let customer: Customer = store
        .get_customer(order.customer_id)
        .map_err(translate_persistence_error)?;
    let order_materials: Vec<OrderMaterial> = store
        .get_order_materials(order_id)
        .map_err(translate_persistence_error)?;

    let mut refs: BTreeSet<MaterialRef> = order_materials.iter().map(|row| row.material).collect();
    refs.extend(extra_refs.iter().copied());
    let refs: Vec<MaterialRef> = refs.into_iter().collect();
    let materials: Vec<Material> = store
        .get_materials(&refs)
        .map_err(translate_persistence_error)?;

    Ok(OrderContext::for_order(
        customer,
        order,
        order_materials,
        materials,
        now,
    ))
}

/// Loads one order with its material rows as an api response.
fn order_info(store: &mut Persistence, order_id: i64) -> Result<OrderInfo, ApiError> {
    let order: Order = store.get_order(order_id).map_err(translate_persistence_error)?;
    let rows: Vec<OrderMaterial> = store
        .get_order_materials(order_id)
        .map_err(translate_persistence_error)?;
    Ok(OrderInfo::from_domain(&order, &rows))
}

/// Applies a command against an existing order, persisting and auditing.
fn apply_order_command(
    store: &mut Persistence,
    order_id: i64,
    command: Command,
    extra_refs: &[MaterialRef],
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    let ctx: OrderContext = load_order_context(store, order_id, extra_refs, now)?;
    let result: TransitionResult = apply(
        &ctx,
        command,
        authenticated_actor.to_audit_actor(),
        client.clone(),
    )
    .map_err(translate_core_error)?;
    let persisted: PersistedOrder = store
        .persist_transition(&result)
        .map_err(translate_persistence_error)?;
    record_audit(store, &result.audit);
    order_info(store, persisted.order_id)
}

// ============================================================================
// Authentication
// ============================================================================

/// Verifies a login and records it in the audit log.
///
/// A successful login stamps the user's last-login time; failures are
/// deliberately indistinguishable between unknown logins, deactivated
/// users, and wrong passwords.
///
/// # Errors
///
/// Returns an error if the credentials do not verify.
pub fn login(
    store: &mut Persistence,
    request: &LoginRequest,
    client: &ClientContext,
) -> Result<LoginResponse, ApiError> {
    let user: UserData = store
        .verify_login(&request.login, &request.password)
        .map_err(translate_persistence_error)?;
    let authenticated: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated.to_audit_actor(),
        AuditAction::Login,
        EntityKind::User,
        Some(user.user_id),
        serde_json::json!({ "login": user.login }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(LoginResponse {
        user_id: user.user_id,
        login: user.login,
        display_name: user.display_name,
        role: user.role,
    })
}

// ============================================================================
// Orders
// ============================================================================

/// Creates a new order from intake attributes.
///
/// The chosen product must be active; its recipe is expanded into the
/// order's material rows and, except for event orders, the required stock
/// is consumed immediately. When no delivery price is given it is looked
/// up from the comuna price list.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, a label or the
/// delivery datetime does not parse, a referenced entity is missing, the
/// recipe is empty, or stock is insufficient.
pub fn create_order(
    store: &mut Persistence,
    config: &BusinessConfig,
    request: CreateOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    AuthorizationService::authorize_manage_orders(authenticated_actor)?;

    let delivery_at: DateTime<Utc> =
        parse_delivery_datetime(&request.delivery_at).map_err(translate_domain_error)?;
    let payment_method: PaymentMethod =
        PaymentMethod::from_str(&request.payment_method).map_err(translate_domain_error)?;
    let tax_document: TaxDocument =
        TaxDocument::from_str(&request.tax_document).map_err(translate_domain_error)?;

    let customer: Customer = store
        .get_customer(request.customer_id)
        .map_err(translate_persistence_error)?;
    let product: Product = store
        .get_product(request.product_id)
        .map_err(translate_persistence_error)?;
    if !product.is_active {
        return Err(translate_domain_error(DomainError::Validation {
            field: "product_id",
            reason: format!("product '{}' is inactive", product.name),
        }));
    }
    let recipe: Vec<RecipeEntry> = store
        .get_recipe(request.product_id)
        .map_err(translate_persistence_error)?;
    let refs: Vec<MaterialRef> = recipe.iter().map(|entry| entry.material).collect();
    let materials: Vec<Material> = store
        .get_materials(&refs)
        .map_err(translate_persistence_error)?;

    let delivery_price: i64 = match request.delivery_price {
        Some(price) => price,
        None => request
            .comuna
            .as_deref()
            .and_then(|comuna| config.delivery_price_for(comuna))
            .ok_or_else(|| ApiError::InvalidInput {
                taxon: "VALIDATION",
                field: String::from("delivery_price"),
                message: String::from(
                    "no delivery price given and the comuna has no suggested price",
                ),
            })?,
    };

    let intake: OrderIntake = OrderIntake {
        customer_id: request.customer_id,
        quantity: request.quantity,
        delivery_at,
        delivery_address: request.delivery_address,
        comuna: request.comuna,
        arrangement_price: request.arrangement_price,
        delivery_price,
        payment_method,
        tax_document,
        photo_url: request.photo_url,
        is_event: request.is_event,
        event_type: request.event_type,
    };

    let ctx: OrderContext = OrderContext::for_intake(customer, product, recipe, materials, now);
    let mut result: TransitionResult = apply(
        &ctx,
        Command::CreateOrder { intake },
        authenticated_actor.to_audit_actor(),
        client.clone(),
    )
    .map_err(translate_core_error)?;
    let persisted: PersistedOrder = store
        .persist_transition(&result)
        .map_err(translate_persistence_error)?;

    // The engine cannot know the order id before persistence.
    result.audit.entity_id = Some(persisted.order_id);
    record_audit(store, &result.audit);

    order_info(store, persisted.order_id)
}

/// Loads one order with its material rows.
///
/// # Errors
///
/// Returns an error if the order does not exist.
pub fn get_order_details(store: &mut Persistence, order_id: i64) -> Result<OrderInfo, ApiError> {
    order_info(store, order_id)
}

/// Lists the orders in one fulfillment bucket, soonest delivery first.
///
/// # Errors
///
/// Returns an error if the status label does not parse or a query fails.
pub fn list_orders(
    store: &mut Persistence,
    status_label: &str,
) -> Result<Vec<OrderInfo>, ApiError> {
    let status: FulfillmentStatus =
        FulfillmentStatus::from_str(status_label).map_err(translate_domain_error)?;
    let orders: Vec<Order> = store
        .list_orders_by_status(status)
        .map_err(translate_persistence_error)?;

    let mut infos: Vec<OrderInfo> = Vec::with_capacity(orders.len());
    for order in &orders {
        let Some(order_id) = order.order_id else {
            continue;
        };
        let rows: Vec<OrderMaterial> = store
            .get_order_materials(order_id)
            .map_err(translate_persistence_error)?;
        infos.push(OrderInfo::from_domain(order, &rows));
    }
    Ok(infos)
}

/// Lists one customer's orders, newest first.
///
/// # Errors
///
/// Returns an error if the customer does not exist or a query fails.
pub fn list_customer_orders(
    store: &mut Persistence,
    customer_id: i64,
) -> Result<Vec<OrderInfo>, ApiError> {
    store
        .get_customer(customer_id)
        .map_err(translate_persistence_error)?;
    let orders: Vec<Order> = store
        .list_orders_for_customer(customer_id)
        .map_err(translate_persistence_error)?;

    let mut infos: Vec<OrderInfo> = Vec::with_capacity(orders.len());
    for order in &orders {
        let Some(order_id) = order.order_id else {
            continue;
        };
        let rows: Vec<OrderMaterial> = store
            .get_order_materials(order_id)
            .map_err(translate_persistence_error)?;
        infos.push(OrderInfo::from_domain(order, &rows));
    }
    Ok(infos)
}

/// Replaces an order's material set.
///
/// Removed quantities are restocked and added quantities consumed under
/// the strict policy; a partial failure rolls the whole edit back.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, a row does not parse,
/// the order is terminal, or stock is insufficient.
pub fn edit_order_materials(
    store: &mut Persistence,
    order_id: i64,
    request: &EditMaterialsRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    AuthorizationService::authorize_manage_orders(authenticated_actor)?;

    let mut materials: Vec<OrderMaterial> = Vec::with_capacity(request.materials.len());
    for row in &request.materials {
        let kind: MaterialKind = MaterialKind::from_str(&row.kind).map_err(translate_domain_error)?;
        let role: MaterialRole = MaterialRole::from_str(&row.role).map_err(translate_domain_error)?;
        materials.push(OrderMaterial {
            material: MaterialRef::new(kind, row.material_id),
            quantity: row.quantity,
            role,
        });
    }
    let extra_refs: Vec<MaterialRef> = materials.iter().map(|row| row.material).collect();

    apply_order_command(
        store,
        order_id,
        Command::EditMaterials { materials },
        &extra_refs,
        authenticated_actor,
        client,
        now,
    )
}

/// Cancels a not-yet-dispatched order, restocking its materials.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the order has
/// already been dispatched, archived, or cancelled.
pub fn cancel_order(
    store: &mut Persistence,
    order_id: i64,
    request: &CancelOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    AuthorizationService::authorize_manage_orders(authenticated_actor)?;

    apply_order_command(
        store,
        order_id,
        Command::Cancel {
            reason: request.reason.clone(),
        },
        &[],
        authenticated_actor,
        client,
        now,
    )
}

/// Dispatches an order that is due today.
///
/// Event orders consume their reserved materials at this point; the
/// overdraw override lets that consumption draw stock below zero.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the order is not in
/// the `today` bucket, or reserved stock is insufficient under the strict
/// policy.
pub fn dispatch_order(
    store: &mut Persistence,
    order_id: i64,
    request: DispatchOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    AuthorizationService::authorize_dispatch(authenticated_actor)?;

    let policy: OverdrawPolicy = if request.allow_overdraw {
        OverdrawPolicy::AllowOverdraw
    } else {
        OverdrawPolicy::Strict
    };
    apply_order_command(
        store,
        order_id,
        Command::Dispatch { policy },
        &[],
        authenticated_actor,
        client,
        now,
    )
}

/// Marks an order paid with the given method.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the label does not
/// parse, the method is `Pendiente`, or the order is already paid or
/// cancelled.
pub fn mark_paid(
    store: &mut Persistence,
    order_id: i64,
    request: &MarkPaidRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    AuthorizationService::authorize_manage_orders(authenticated_actor)?;

    let method: PaymentMethod =
        PaymentMethod::from_str(&request.payment_method).map_err(translate_domain_error)?;
    apply_order_command(
        store,
        order_id,
        Command::MarkPaid { method },
        &[],
        authenticated_actor,
        client,
        now,
    )
}

/// Moves an order's tax-document machine to a new state.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the label does not
/// parse, the transition is illegal, or an issued state is missing its
/// document number.
pub fn set_tax_document(
    store: &mut Persistence,
    order_id: i64,
    request: &SetTaxDocumentRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<OrderInfo, ApiError> {
    AuthorizationService::authorize_manage_orders(authenticated_actor)?;

    let document: TaxDocument =
        TaxDocument::from_str(&request.tax_document).map_err(translate_domain_error)?;
    apply_order_command(
        store,
        order_id,
        Command::SetTaxDocument {
            document,
            document_number: request.document_number.clone(),
        },
        &[],
        authenticated_actor,
        client,
        now,
    )
}

/// Runs the scheduled reclassification sweep.
///
/// Time-bucket orders whose classification against the current clock has
/// changed are moved, and dispatched orders past their delivery day are
/// archived. Each moved order produces one audit record attributed to the
/// system actor. Running the sweep again within the same local day is a
/// no-op.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or any transition
/// fails to persist.
pub fn sweep_orders(
    store: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
    now: DateTime<Utc>,
) -> Result<SweepResponse, ApiError> {
    AuthorizationService::authorize_sweep(authenticated_actor)?;

    let orders: Vec<Order> = store
        .list_sweepable_orders()
        .map_err(translate_persistence_error)?;
    let planned: Vec<PlannedTransition> = plan_sweep(&orders, now);

    let mut moved: Vec<SweepMoveInfo> = Vec::with_capacity(planned.len());
    for transition in &planned {
        let ctx: OrderContext = load_order_context(store, transition.order_id, &[], now)?;
        let result: TransitionResult = apply(
            &ctx,
            Command::Reclassify { to: transition.to },
            Actor::system(),
            client.clone(),
        )
        .map_err(translate_core_error)?;
        store
            .persist_transition(&result)
            .map_err(translate_persistence_error)?;
        record_audit(store, &result.audit);

        moved.push(SweepMoveInfo {
            order_id: transition.order_id,
            from: transition.from.as_str().to_string(),
            to: transition.to.as_str().to_string(),
        });
    }

    Ok(SweepResponse { moved })
}

// ============================================================================
// Materials
// ============================================================================

/// Creates a material in its kind table.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the kind label does
/// not parse, or validation fails.
pub fn create_material(
    store: &mut Persistence,
    request: CreateMaterialRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<MaterialInfo, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let kind: MaterialKind = MaterialKind::from_str(&request.kind).map_err(translate_domain_error)?;
    let material: Material = Material::new(
        kind,
        request.name,
        request.on_hand,
        request.low_stock_threshold,
        request.unit_cost,
    );
    let material_id: i64 = store
        .create_material(&material)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogCreate,
        material_entity_kind(kind),
        Some(material_id),
        serde_json::json!({ "name": material.name, "on_hand": material.on_hand }),
        client.clone(),
    );
    record_audit(store, &record);

    let stored: Material = store
        .get_material(MaterialRef::new(kind, material_id))
        .map_err(translate_persistence_error)?;
    Ok(MaterialInfo::from_domain(&stored))
}

/// Updates a material's name, threshold, and unit cost.
///
/// Stock counters are untouched; they change only through the inventory
/// ledger and the restock path.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the material is
/// missing, or validation fails.
pub fn update_material(
    store: &mut Persistence,
    request: UpdateMaterialRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<MaterialInfo, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let kind: MaterialKind = MaterialKind::from_str(&request.kind).map_err(translate_domain_error)?;
    let reference: MaterialRef = MaterialRef::new(kind, request.material_id);
    let mut material: Material = store
        .get_material(reference)
        .map_err(translate_persistence_error)?;
    material.name = request.name;
    material.low_stock_threshold = request.low_stock_threshold;
    material.unit_cost = request.unit_cost;
    store
        .update_material(&material)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        material_entity_kind(kind),
        Some(request.material_id),
        serde_json::json!({ "name": material.name }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(MaterialInfo::from_domain(&material))
}

/// Adds stock to a material.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the quantity is not
/// positive, or the material is missing.
pub fn restock_material(
    store: &mut Persistence,
    request: RestockRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<MaterialInfo, ApiError> {
    AuthorizationService::authorize_stock(authenticated_actor)?;

    let kind: MaterialKind = MaterialKind::from_str(&request.kind).map_err(translate_domain_error)?;
    let reference: MaterialRef = MaterialRef::new(kind, request.material_id);
    store
        .restock_material(reference, request.quantity)
        .map_err(translate_persistence_error)?;

    let stored: Material = store
        .get_material(reference)
        .map_err(translate_persistence_error)?;
    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::Restock,
        material_entity_kind(kind),
        Some(request.material_id),
        serde_json::json!({
            "name": stored.name,
            "quantity": request.quantity,
            "on_hand": stored.on_hand,
        }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(MaterialInfo::from_domain(&stored))
}

/// Deletes a material unless a live order still references it.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the material is
/// missing, or a non-terminal order still needs it.
pub fn delete_material(
    store: &mut Persistence,
    kind_label: &str,
    material_id: i64,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let kind: MaterialKind = MaterialKind::from_str(kind_label).map_err(translate_domain_error)?;
    let reference: MaterialRef = MaterialRef::new(kind, material_id);
    let material: Material = store
        .get_material(reference)
        .map_err(translate_persistence_error)?;
    store
        .delete_material(reference)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        material_entity_kind(kind),
        Some(material_id),
        serde_json::json!({ "name": material.name, "deleted": true }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(())
}

/// Lists every material of one kind, alphabetically.
///
/// # Errors
///
/// Returns an error if the kind label does not parse or the query fails.
pub fn list_materials(
    store: &mut Persistence,
    kind_label: &str,
) -> Result<Vec<MaterialInfo>, ApiError> {
    let kind: MaterialKind = MaterialKind::from_str(kind_label).map_err(translate_domain_error)?;
    let materials: Vec<Material> = store
        .list_materials(kind)
        .map_err(translate_persistence_error)?;
    Ok(materials.iter().map(MaterialInfo::from_domain).collect())
}

/// Lists every material at or below its low-stock threshold.
///
/// Read-only; flowers come first, then containers, each alphabetically.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn low_stock_report(store: &mut Persistence) -> Result<Vec<MaterialInfo>, ApiError> {
    let materials: Vec<Material> = store.list_low_stock().map_err(translate_persistence_error)?;
    Ok(materials.iter().map(MaterialInfo::from_domain).collect())
}

// ============================================================================
// Products & Recipes
// ============================================================================

/// Creates a product.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or validation fails.
pub fn create_product(
    store: &mut Persistence,
    request: CreateProductRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<ProductInfo, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let product: Product = Product::new(request.name, request.category, request.base_price);
    let product_id: i64 = store
        .create_product(&product)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogCreate,
        EntityKind::Product,
        Some(product_id),
        serde_json::json!({ "name": product.name, "base_price": product.base_price }),
        client.clone(),
    );
    record_audit(store, &record);

    let stored: Product = store
        .get_product(product_id)
        .map_err(translate_persistence_error)?;
    Ok(ProductInfo::from_domain(&stored))
}

/// Updates a product; deactivation goes through here.
///
/// Deactivated products stay referenced by historical orders but
/// disappear from intake.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the product is
/// missing, or validation fails.
pub fn update_product(
    store: &mut Persistence,
    request: UpdateProductRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<ProductInfo, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let product: Product = Product {
        product_id: Some(request.product_id),
        name: request.name,
        category: request.category,
        base_price: request.base_price,
        is_active: request.is_active,
    };
    store
        .update_product(&product)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        EntityKind::Product,
        Some(request.product_id),
        serde_json::json!({ "name": product.name, "is_active": product.is_active }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(ProductInfo::from_domain(&product))
}

/// Replaces a product's recipe with a new set of entries.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, a kind label does not
/// parse, the product is missing, or the entries contain a duplicate
/// material or a non-positive quantity.
pub fn set_product_recipe(
    store: &mut Persistence,
    product_id: i64,
    request: &SetRecipeRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<Vec<RecipeEntryInfo>, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let mut entries: Vec<RecipeEntry> = Vec::with_capacity(request.entries.len());
    for entry in &request.entries {
        let kind: MaterialKind =
            MaterialKind::from_str(&entry.kind).map_err(translate_domain_error)?;
        entries.push(RecipeEntry {
            product_id,
            material: MaterialRef::new(kind, entry.material_id),
            quantity: entry.quantity,
        });
    }
    store
        .set_recipe(product_id, &entries)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        EntityKind::Product,
        Some(product_id),
        serde_json::json!({ "recipe_entries": entries.len() }),
        client.clone(),
    );
    record_audit(store, &record);

    let stored: Vec<RecipeEntry> = store
        .get_recipe(product_id)
        .map_err(translate_persistence_error)?;
    Ok(stored.iter().map(RecipeEntryInfo::from_domain).collect())
}

/// Loads one product with its recipe entries.
///
/// # Errors
///
/// Returns an error if the product does not exist.
pub fn get_product_details(
    store: &mut Persistence,
    product_id: i64,
) -> Result<ProductDetailInfo, ApiError> {
    let product: Product = store
        .get_product(product_id)
        .map_err(translate_persistence_error)?;
    let recipe: Vec<RecipeEntry> = store
        .get_recipe(product_id)
        .map_err(translate_persistence_error)?;
    Ok(ProductDetailInfo {
        product: ProductInfo::from_domain(&product),
        recipe: recipe.iter().map(RecipeEntryInfo::from_domain).collect(),
    })
}

/// Lists products, optionally restricted to active ones.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_products(
    store: &mut Persistence,
    only_active: bool,
) -> Result<Vec<ProductInfo>, ApiError> {
    let products: Vec<Product> = store
        .list_products(only_active)
        .map_err(translate_persistence_error)?;
    Ok(products.iter().map(ProductInfo::from_domain).collect())
}

// ============================================================================
// Customers
// ============================================================================

/// Creates a customer.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the credit-class
/// label does not parse, or validation fails.
pub fn create_customer(
    store: &mut Persistence,
    request: CustomerRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<CustomerInfo, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let credit_class: CreditClass =
        CreditClass::from_str(&request.credit_class).map_err(translate_domain_error)?;
    let customer: Customer = Customer::new(request.name, request.contact, credit_class);
    let customer_id: i64 = store
        .create_customer(&customer)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogCreate,
        EntityKind::Customer,
        Some(customer_id),
        serde_json::json!({ "name": customer.name, "credit_class": credit_class.as_str() }),
        client.clone(),
    );
    record_audit(store, &record);

    let stored: Customer = store
        .get_customer(customer_id)
        .map_err(translate_persistence_error)?;
    Ok(CustomerInfo::from_domain(&stored))
}

/// Updates a customer's attributes.
///
/// The cached lifetime totals are untouched; they are rebuilt inside
/// every order-modifying transaction and by the repair routine.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the customer is
/// missing, the credit-class label does not parse, or validation fails.
pub fn update_customer(
    store: &mut Persistence,
    customer_id: i64,
    request: CustomerRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<CustomerInfo, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let credit_class: CreditClass =
        CreditClass::from_str(&request.credit_class).map_err(translate_domain_error)?;
    let mut customer: Customer = store
        .get_customer(customer_id)
        .map_err(translate_persistence_error)?;
    customer.name = request.name;
    customer.contact = request.contact;
    customer.credit_class = credit_class;
    store
        .update_customer(&customer)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        EntityKind::Customer,
        Some(customer_id),
        serde_json::json!({ "name": customer.name, "credit_class": credit_class.as_str() }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(CustomerInfo::from_domain(&customer))
}

/// Deletes a customer unless any order references them.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the customer is
/// missing, or the customer has orders.
pub fn delete_customer(
    store: &mut Persistence,
    customer_id: i64,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<(), ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let customer: Customer = store
        .get_customer(customer_id)
        .map_err(translate_persistence_error)?;
    store
        .delete_customer(customer_id)
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        EntityKind::Customer,
        Some(customer_id),
        serde_json::json!({ "name": customer.name, "deleted": true }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(())
}

/// Loads one customer.
///
/// # Errors
///
/// Returns an error if the customer does not exist.
pub fn get_customer_details(
    store: &mut Persistence,
    customer_id: i64,
) -> Result<CustomerInfo, ApiError> {
    let customer: Customer = store
        .get_customer(customer_id)
        .map_err(translate_persistence_error)?;
    Ok(CustomerInfo::from_domain(&customer))
}

/// Lists every customer, alphabetically.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_customers(store: &mut Persistence) -> Result<Vec<CustomerInfo>, ApiError> {
    let customers: Vec<Customer> = store.list_customers().map_err(translate_persistence_error)?;
    Ok(customers.iter().map(CustomerInfo::from_domain).collect())
}

// ============================================================================
// Stock import
// ============================================================================

/// Previews a stock import without mutating the store.
///
/// Valid rows are classified as `would_restock` or `would_create`
/// depending on whether a material with the same kind and name already
/// exists.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the CSV header is
/// malformed.
pub fn preview_stock_import(
    store: &mut Persistence,
    csv_data: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StockImportResponse, ApiError> {
    AuthorizationService::authorize_stock(authenticated_actor)?;

    let parsed: Vec<Result<StockRow, crate::csv_import::StockRowError>> =
        parse_stock_csv(csv_data)?;

    let mut rows: Vec<StockImportRowInfo> = Vec::with_capacity(parsed.len());
    let mut applied: usize = 0;
    let mut failed: usize = 0;
    for row in parsed {
        match row {
            Ok(row) => {
                let existing: Option<Material> = store
                    .find_material_by_name(row.kind, &row.name)
                    .map_err(translate_persistence_error)?;
                let status: &str = if existing.is_some() {
                    "would_restock"
                } else {
                    "would_create"
                };
                applied += 1;
                rows.push(StockImportRowInfo {
                    line: row.line,
                    kind: row.kind.as_str().to_string(),
                    name: row.name,
                    quantity: row.quantity,
                    status: status.to_string(),
                    message: None,
                });
            }
            Err(error) => {
                failed += 1;
                rows.push(StockImportRowInfo {
                    line: error.line,
                    kind: error.kind,
                    name: error.name,
                    quantity: error.quantity,
                    status: String::from("error"),
                    message: Some(error.message),
                });
            }
        }
    }

    Ok(StockImportResponse {
        applied,
        failed,
        rows,
    })
}

/// Imports stock quantities from CSV data.
///
/// Each valid row either restocks an existing material or creates a new
/// one, and produces one audit record. Invalid rows are reported and
/// skipped; they never abort the rows around them.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the CSV header is
/// malformed.
pub fn import_stock(
    store: &mut Persistence,
    csv_data: &str,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<StockImportResponse, ApiError> {
    AuthorizationService::authorize_stock(authenticated_actor)?;

    let parsed: Vec<Result<StockRow, crate::csv_import::StockRowError>> =
        parse_stock_csv(csv_data)?;

    let mut rows: Vec<StockImportRowInfo> = Vec::with_capacity(parsed.len());
    let mut applied: usize = 0;
    let mut failed: usize = 0;
    for row in parsed {
        match row {
            Ok(row) => match apply_stock_row(store, &row, authenticated_actor, client) {
                Ok(status) => {
                    applied += 1;
                    rows.push(StockImportRowInfo {
                        line: row.line,
                        kind: row.kind.as_str().to_string(),
                        name: row.name,
                        quantity: row.quantity,
                        status: status.to_string(),
                        message: None,
                    });
                }
                Err(e) => {
                    failed += 1;
                    rows.push(StockImportRowInfo {
                        line: row.line,
                        kind: row.kind.as_str().to_string(),
                        name: row.name,
                        quantity: row.quantity,
                        status: String::from("error"),
                        message: Some(e.to_string()),
                    });
                }
            },
            Err(error) => {
                failed += 1;
                rows.push(StockImportRowInfo {
                    line: error.line,
                    kind: error.kind,
                    name: error.name,
                    quantity: error.quantity,
                    status: String::from("error"),
                    message: Some(error.message),
                });
            }
        }
    }

    Ok(StockImportResponse {
        applied,
        failed,
        rows,
    })
}

/// Applies one valid stock row, returning the outcome label.
fn apply_stock_row(
    store: &mut Persistence,
    row: &StockRow,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<&'static str, ApiError> {
    let existing: Option<Material> = store
        .find_material_by_name(row.kind, &row.name)
        .map_err(translate_persistence_error)?;

    let (material_id, status): (i64, &'static str) = match existing {
        Some(material) => {
            let reference: MaterialRef = material.reference().map_err(translate_domain_error)?;
            store
                .restock_material(reference, row.quantity)
                .map_err(translate_persistence_error)?;
            (reference.id, "restocked")
        }
        None => {
            let material: Material = Material::new(
                row.kind,
                row.name.clone(),
                row.quantity,
                IMPORT_LOW_STOCK_THRESHOLD,
                row.unit_cost,
            );
            let material_id: i64 = store
                .create_material(&material)
                .map_err(translate_persistence_error)?;
            (material_id, "created")
        }
    };

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::StockImport,
        material_entity_kind(row.kind),
        Some(material_id),
        serde_json::json!({
            "name": row.name,
            "quantity": row.quantity,
            "outcome": status,
        }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(status)
}

// ============================================================================
// Audit log
// ============================================================================

/// Queries the audit log, newest first, paged and capped.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, a filter label does
/// not parse, or the query fails.
pub fn query_audit_log(
    store: &mut Persistence,
    request: &AuditQueryRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<AuditRecordInfo>, ApiError> {
    AuthorizationService::authorize_view_audit(authenticated_actor)?;

    let action: Option<AuditAction> = match request.action.as_deref() {
        Some(label) => Some(AuditAction::parse(label).ok_or_else(|| ApiError::InvalidInput {
            taxon: "VALIDATION",
            field: String::from("action"),
            message: format!("unknown action label '{label}'"),
        })?),
        None => None,
    };
    let entity_kind: Option<EntityKind> = match request.entity_kind.as_deref() {
        Some(label) => Some(EntityKind::parse(label).ok_or_else(|| ApiError::InvalidInput {
            taxon: "VALIDATION",
            field: String::from("entity_kind"),
            message: format!("unknown entity kind '{label}'"),
        })?),
        None => None,
    };
    let from: Option<DateTime<Utc>> = parse_bound(request.from.as_deref(), "from")?;
    let to: Option<DateTime<Utc>> = parse_bound(request.to.as_deref(), "to")?;

    let filter: AuditFilter = AuditFilter {
        actor_id: request.actor_id,
        action,
        entity_kind,
        from,
        to,
        page: request.page,
        page_size: request.page_size,
    };
    let records: Vec<AuditRecord> = store
        .query_audit(&filter)
        .map_err(translate_persistence_error)?;

    Ok(records
        .iter()
        .map(|record| AuditRecordInfo {
            audit_id: record.audit_id.unwrap_or_default(),
            actor_user_id: record.actor.user_id,
            actor_name: record.actor.name.clone(),
            action: record.action.as_str().to_string(),
            entity_kind: record.entity_kind.as_str().to_string(),
            entity_id: record.entity_id,
            details: record.details.clone(),
            client_ip: record.client.ip.clone(),
            user_agent: record.client.user_agent.clone(),
            recorded_at: record.recorded_at.to_rfc3339(),
        })
        .collect())
}

/// Parses an optional RFC 3339 bound for an audit query.
fn parse_bound(value: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    match value {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| ApiError::InvalidInput {
                taxon: "VALIDATION",
                field: field.to_string(),
                message: format!("not an RFC 3339 timestamp: {e}"),
            }),
        None => Ok(None),
    }
}

// ============================================================================
// Users
// ============================================================================

/// Creates a user with a bcrypt-hashed password.
///
/// # Errors
///
/// Returns an error if the actor is not authorized, the role is unknown,
/// the password is too short, or the login is taken.
pub fn create_user(
    store: &mut Persistence,
    request: &CreateUserRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::authorize_manage_users(authenticated_actor)?;

    let user_id: i64 = store
        .create_user(
            &request.login,
            &request.password,
            &request.display_name,
            &request.role,
        )
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogCreate,
        EntityKind::User,
        Some(user_id),
        serde_json::json!({ "login": request.login, "role": request.role }),
        client.clone(),
    );
    record_audit(store, &record);

    let stored: UserData = store.get_user(user_id).map_err(translate_persistence_error)?;
    Ok(UserInfo::from_data(&stored))
}

/// Activates or deactivates a user.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the user does not
/// exist.
pub fn set_user_active(
    store: &mut Persistence,
    user_id: i64,
    request: SetUserActiveRequest,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<UserInfo, ApiError> {
    AuthorizationService::authorize_manage_users(authenticated_actor)?;

    store
        .set_user_active(user_id, request.is_active)
        .map_err(translate_persistence_error)?;
    let stored: UserData = store.get_user(user_id).map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::CatalogUpdate,
        EntityKind::User,
        Some(user_id),
        serde_json::json!({ "login": stored.login, "is_active": request.is_active }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(UserInfo::from_data(&stored))
}

/// Lists every user, by login. Password material never leaves the
/// persistence crate.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or the query fails.
pub fn list_users(
    store: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<UserInfo>, ApiError> {
    AuthorizationService::authorize_manage_users(authenticated_actor)?;

    let users: Vec<UserData> = store.list_users().map_err(translate_persistence_error)?;
    Ok(users.iter().map(UserInfo::from_data).collect())
}

// ============================================================================
// Maintenance
// ============================================================================

/// Runs the integrity repair pass.
///
/// Duplicate recipe and order-material rows are removed with the greatest
/// quantity winning, and every customer's cached totals are rebuilt.
///
/// # Errors
///
/// Returns an error if the actor is not authorized or a cleanup
/// statement fails.
pub fn repair(
    store: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
    client: &ClientContext,
) -> Result<RepairResponse, ApiError> {
    AuthorizationService::authorize_repair(authenticated_actor)?;

    let report: RepairReport = store
        .repair_integrity()
        .map_err(translate_persistence_error)?;

    let record: AuditRecord = AuditRecord::new(
        authenticated_actor.to_audit_actor(),
        AuditAction::Repair,
        EntityKind::System,
        None,
        serde_json::json!({
            "duplicate_recipes_removed": report.duplicate_recipes_removed,
            "duplicate_order_materials_removed": report.duplicate_order_materials_removed,
            "customers_rebuilt": report.customers_rebuilt,
        }),
        client.clone(),
    );
    record_audit(store, &record);

    Ok(RepairResponse {
        duplicate_recipes_removed: report.duplicate_recipes_removed,
        duplicate_order_materials_removed: report.duplicate_order_materials_removed,
        customers_rebuilt: report.customers_rebuilt,
    })
}
