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

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use chrono::Utc;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;
use violeta_api::{
    ApiError, AuditQueryRequest, AuditRecordInfo, AuthenticatedActor, CancelOrderRequest,
    CreateMaterialRequest, CreateOrderRequest, CreateProductRequest, CreateUserRequest,
    CustomerInfo, CustomerRequest, DispatchOrderRequest, EditMaterialsRequest, LoginRequest,
    LoginResponse, MarkPaidRequest, MaterialInfo, OrderInfo, ProductDetailInfo, ProductInfo,
    RecipeEntryInfo, RepairResponse, RestockRequest, SetRecipeRequest, SetTaxDocumentRequest,
    SetUserActiveRequest, StockImportResponse, SweepResponse, UpdateMaterialRequest,
    UpdateProductRequest, UserInfo, cancel_order, create_customer, create_material, create_order,
    create_product, create_user, delete_customer, delete_material, dispatch_order,
    edit_order_materials, get_customer_details, get_order_details, get_product_details,
    import_stock, list_customer_orders, list_customers, list_materials, list_orders,
    list_products, list_users, login, low_stock_report, mark_paid, preview_stock_import,
    query_audit_log, repair, restock_material, set_product_recipe, set_tax_document,
    set_user_active, sweep_orders, update_customer, update_material, update_product,
};
use violeta_audit::ClientContext;
use violeta_domain::BusinessConfig;
use violeta_persistence::Persistence;

/// Violeta Server - HTTP server for the florist back office
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Path to a JSON file with the business configuration (delivery prices
    /// per comuna). If not provided, the built-in defaults are used.
    #[arg(short, long)]
    config: Option<String>,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, wrapped in a Mutex for safe concurrent access.
    store: Arc<Mutex<Persistence>>,
    /// Delivery pricing and other business parameters.
    config: Arc<BusinessConfig>,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable machine-readable error category.
    taxon: String,
    /// Human-readable error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Stable machine-readable error category.
    taxon: String,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            taxon: self.taxon,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            taxon: err.taxon().to_string(),
            message: err.to_string(),
        }
    }
}

/// Builds the client context from the request headers.
fn client_context(headers: &HeaderMap) -> ClientContext {
    let ip: Option<String> = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string());
    let user_agent: Option<String> = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    ClientContext::new(ip, user_agent)
}

/// Resolves the acting user from the `x-user-id` header.
///
/// A missing or unparseable header, an unknown user id, or an inactive
/// account all yield 401.
async fn resolve_actor(
    app_state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedActor, HttpError> {
    let user_id: i64 = headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| HttpError {
            status: StatusCode::UNAUTHORIZED,
            taxon: String::from("AUTH_FAILED"),
            message: String::from("missing or invalid x-user-id header"),
        })?;

    let mut store = app_state.store.lock().await;
    let user = store.get_user(user_id).map_err(|_| HttpError {
        status: StatusCode::UNAUTHORIZED,
        taxon: String::from("AUTH_FAILED"),
        message: format!("unknown user id {user_id}"),
    })?;
    drop(store);

    let actor: AuthenticatedActor =
        AuthenticatedActor::from_user(&user).map_err(|err| HttpError::from(ApiError::from(err)))?;
    Ok(actor)
}

// ============================================================================
// Authentication
// ============================================================================

/// Handler for POST /login.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login = %request.login, "Handling login request");

    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let response: LoginResponse = login(&mut store, &request, &client)?;
    drop(store);

    Ok(Json(response))
}

// ============================================================================
// Orders
// ============================================================================

/// Query parameters for GET /orders.
#[derive(Debug, Clone, Deserialize)]
struct OrderListQuery {
    /// Fulfillment bucket label, e.g. `today` or `dispatched`.
    status: String,
}

/// Handler for POST /orders.
async fn handle_create_order(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(
        customer_id = request.customer_id,
        product_id = request.product_id,
        "Handling create_order request"
    );

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let order: OrderInfo = create_order(
        &mut store,
        &app_state.config,
        request,
        &actor,
        &client,
        Utc::now(),
    )?;
    drop(store);

    Ok(Json(order))
}

/// Handler for GET /orders.
async fn handle_list_orders(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<OrderListQuery>,
) -> Result<Json<Vec<OrderInfo>>, HttpError> {
    info!(status = %params.status, "Handling list_orders request");

    let mut store = app_state.store.lock().await;
    let orders: Vec<OrderInfo> = list_orders(&mut store, &params.status)?;
    drop(store);

    Ok(Json(orders))
}

/// Handler for GET `/orders/{order_id}`.
async fn handle_get_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(order_id = order_id, "Handling get_order request");

    let mut store = app_state.store.lock().await;
    let order: OrderInfo = get_order_details(&mut store, order_id)?;
    drop(store);

    Ok(Json(order))
}

/// Handler for PUT `/orders/{order_id}/materials`.
async fn handle_edit_order_materials(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<EditMaterialsRequest>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(order_id = order_id, "Handling edit_order_materials request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let order: OrderInfo =
        edit_order_materials(&mut store, order_id, &request, &actor, &client, Utc::now())?;
    drop(store);

    Ok(Json(order))
}

/// Handler for POST `/orders/{order_id}/cancel`.
async fn handle_cancel_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<CancelOrderRequest>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(order_id = order_id, "Handling cancel_order request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let order: OrderInfo =
        cancel_order(&mut store, order_id, &request, &actor, &client, Utc::now())?;
    drop(store);

    Ok(Json(order))
}

/// Handler for POST `/orders/{order_id}/dispatch`.
async fn handle_dispatch_order(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<DispatchOrderRequest>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(order_id = order_id, "Handling dispatch_order request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let order: OrderInfo =
        dispatch_order(&mut store, order_id, request, &actor, &client, Utc::now())?;
    drop(store);

    Ok(Json(order))
}

/// Handler for POST `/orders/{order_id}/pay`.
async fn handle_mark_paid(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<MarkPaidRequest>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(order_id = order_id, "Handling mark_paid request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let order: OrderInfo = mark_paid(&mut store, order_id, &request, &actor, &client, Utc::now())?;
    drop(store);

    Ok(Json(order))
}

/// Handler for POST `/orders/{order_id}/tax_document`.
async fn handle_set_tax_document(
    AxumState(app_state): AxumState<AppState>,
    Path(order_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<SetTaxDocumentRequest>,
) -> Result<Json<OrderInfo>, HttpError> {
    info!(order_id = order_id, "Handling set_tax_document request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let order: OrderInfo =
        set_tax_document(&mut store, order_id, &request, &actor, &client, Utc::now())?;
    drop(store);

    Ok(Json(order))
}

/// Handler for POST /orders/sweep.
async fn handle_sweep_orders(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<SweepResponse>, HttpError> {
    info!("Handling sweep_orders request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let response: SweepResponse = sweep_orders(&mut store, &actor, &client, Utc::now())?;
    drop(store);

    Ok(Json(response))
}

/// Handler for GET `/customers/{customer_id}/orders`.
async fn handle_list_customer_orders(
    AxumState(app_state): AxumState<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<Vec<OrderInfo>>, HttpError> {
    info!(
        customer_id = customer_id,
        "Handling list_customer_orders request"
    );

    let mut store = app_state.store.lock().await;
    let orders: Vec<OrderInfo> = list_customer_orders(&mut store, customer_id)?;
    drop(store);

    Ok(Json(orders))
}

// ============================================================================
// Materials
// ============================================================================

/// Query parameters for GET /materials.
#[derive(Debug, Clone, Deserialize)]
struct MaterialListQuery {
    /// Material kind label, `flower` or `container`.
    kind: String,
}

/// Handler for POST /materials.
async fn handle_create_material(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateMaterialRequest>,
) -> Result<Json<MaterialInfo>, HttpError> {
    info!(name = %request.name, "Handling create_material request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let material: MaterialInfo = create_material(&mut store, request, &actor, &client)?;
    drop(store);

    Ok(Json(material))
}

/// Handler for PUT /materials.
async fn handle_update_material(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateMaterialRequest>,
) -> Result<Json<MaterialInfo>, HttpError> {
    info!(
        material_id = request.material_id,
        "Handling update_material request"
    );

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let material: MaterialInfo = update_material(&mut store, request, &actor, &client)?;
    drop(store);

    Ok(Json(material))
}

/// Handler for POST /materials/restock.
async fn handle_restock_material(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<RestockRequest>,
) -> Result<Json<MaterialInfo>, HttpError> {
    info!(
        material_id = request.material_id,
        quantity = request.quantity,
        "Handling restock_material request"
    );

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let material: MaterialInfo = restock_material(&mut store, request, &actor, &client)?;
    drop(store);

    Ok(Json(material))
}

/// Handler for DELETE `/materials/{kind}/{material_id}`.
async fn handle_delete_material(
    AxumState(app_state): AxumState<AppState>,
    Path((kind, material_id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    info!(
        kind = %kind,
        material_id = material_id,
        "Handling delete_material request"
    );

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    delete_material(&mut store, &kind, material_id, &actor, &client)?;
    drop(store);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /materials.
async fn handle_list_materials(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<MaterialListQuery>,
) -> Result<Json<Vec<MaterialInfo>>, HttpError> {
    info!(kind = %params.kind, "Handling list_materials request");

    let mut store = app_state.store.lock().await;
    let materials: Vec<MaterialInfo> = list_materials(&mut store, &params.kind)?;
    drop(store);

    Ok(Json(materials))
}

/// Handler for GET /materials/low_stock.
async fn handle_low_stock_report(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<MaterialInfo>>, HttpError> {
    info!("Handling low_stock_report request");

    let mut store = app_state.store.lock().await;
    let materials: Vec<MaterialInfo> = low_stock_report(&mut store)?;
    drop(store);

    Ok(Json(materials))
}

// ============================================================================
// Products & recipes
// ============================================================================

/// Query parameters for GET /products.
#[derive(Debug, Clone, Deserialize)]
struct ProductListQuery {
    /// When true, only active products are returned.
    #[serde(default)]
    only_active: bool,
}

/// Handler for POST /products.
async fn handle_create_product(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateProductRequest>,
) -> Result<Json<ProductInfo>, HttpError> {
    info!(name = %request.name, "Handling create_product request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let product: ProductInfo = create_product(&mut store, request, &actor, &client)?;
    drop(store);

    Ok(Json(product))
}

/// Handler for PUT /products.
async fn handle_update_product(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductInfo>, HttpError> {
    info!(
        product_id = request.product_id,
        "Handling update_product request"
    );

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let product: ProductInfo = update_product(&mut store, request, &actor, &client)?;
    drop(store);

    Ok(Json(product))
}

/// Handler for PUT `/products/{product_id}/recipe`.
async fn handle_set_product_recipe(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<SetRecipeRequest>,
) -> Result<Json<Vec<RecipeEntryInfo>>, HttpError> {
    info!(product_id = product_id, "Handling set_product_recipe request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let recipe: Vec<RecipeEntryInfo> =
        set_product_recipe(&mut store, product_id, &request, &actor, &client)?;
    drop(store);

    Ok(Json(recipe))
}

/// Handler for GET `/products/{product_id}`.
async fn handle_get_product(
    AxumState(app_state): AxumState<AppState>,
    Path(product_id): Path<i64>,
) -> Result<Json<ProductDetailInfo>, HttpError> {
    info!(product_id = product_id, "Handling get_product request");

    let mut store = app_state.store.lock().await;
    let product: ProductDetailInfo = get_product_details(&mut store, product_id)?;
    drop(store);

    Ok(Json(product))
}

/// Handler for GET /products.
async fn handle_list_products(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductInfo>>, HttpError> {
    info!(
        only_active = params.only_active,
        "Handling list_products request"
    );

    let mut store = app_state.store.lock().await;
    let products: Vec<ProductInfo> = list_products(&mut store, params.only_active)?;
    drop(store);

    Ok(Json(products))
}

// ============================================================================
// Customers
// ============================================================================

/// Handler for POST /customers.
async fn handle_create_customer(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<CustomerInfo>, HttpError> {
    info!(name = %request.name, "Handling create_customer request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let customer: CustomerInfo = create_customer(&mut store, request, &actor, &client)?;
    drop(store);

    Ok(Json(customer))
}

/// Handler for PUT `/customers/{customer_id}`.
async fn handle_update_customer(
    AxumState(app_state): AxumState<AppState>,
    Path(customer_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<CustomerInfo>, HttpError> {
    info!(customer_id = customer_id, "Handling update_customer request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let customer: CustomerInfo =
        update_customer(&mut store, customer_id, request, &actor, &client)?;
    drop(store);

    Ok(Json(customer))
}

/// Handler for DELETE `/customers/{customer_id}`.
async fn handle_delete_customer(
    AxumState(app_state): AxumState<AppState>,
    Path(customer_id): Path<i64>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    info!(customer_id = customer_id, "Handling delete_customer request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    delete_customer(&mut store, customer_id, &actor, &client)?;
    drop(store);

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/customers/{customer_id}`.
async fn handle_get_customer(
    AxumState(app_state): AxumState<AppState>,
    Path(customer_id): Path<i64>,
) -> Result<Json<CustomerInfo>, HttpError> {
    info!(customer_id = customer_id, "Handling get_customer request");

    let mut store = app_state.store.lock().await;
    let customer: CustomerInfo = get_customer_details(&mut store, customer_id)?;
    drop(store);

    Ok(Json(customer))
}

/// Handler for GET /customers.
async fn handle_list_customers(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<CustomerInfo>>, HttpError> {
    info!("Handling list_customers request");

    let mut store = app_state.store.lock().await;
    let customers: Vec<CustomerInfo> = list_customers(&mut store)?;
    drop(store);

    Ok(Json(customers))
}

// ============================================================================
// Stock import
// ============================================================================

/// Request body for the stock import endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct StockImportApiRequest {
    /// Raw CSV text with `kind,name,quantity,unit_cost` columns.
    csv_data: String,
}

/// Handler for POST /stock/import/preview.
async fn handle_preview_stock_import(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<StockImportApiRequest>,
) -> Result<Json<StockImportResponse>, HttpError> {
    info!("Handling preview_stock_import request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let mut store = app_state.store.lock().await;
    let response: StockImportResponse =
        preview_stock_import(&mut store, &request.csv_data, &actor)?;
    drop(store);

    Ok(Json(response))
}

/// Handler for POST /stock/import.
async fn handle_import_stock(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<StockImportApiRequest>,
) -> Result<Json<StockImportResponse>, HttpError> {
    info!("Handling import_stock request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let response: StockImportResponse =
        import_stock(&mut store, &request.csv_data, &actor, &client)?;
    drop(store);

    Ok(Json(response))
}

// ============================================================================
// Audit log
// ============================================================================

/// Handler for GET /audit.
async fn handle_query_audit(
    AxumState(app_state): AxumState<AppState>,
    Query(request): Query<AuditQueryRequest>,
    headers: HeaderMap,
) -> Result<Json<Vec<AuditRecordInfo>>, HttpError> {
    info!("Handling query_audit request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let mut store = app_state.store.lock().await;
    let records: Vec<AuditRecordInfo> = query_audit_log(&mut store, &request, &actor)?;
    drop(store);

    Ok(Json(records))
}

// ============================================================================
// Users & maintenance
// ============================================================================

/// Handler for POST /users.
async fn handle_create_user(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(login = %request.login, "Handling create_user request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let user: UserInfo = create_user(&mut store, &request, &actor, &client)?;
    drop(store);

    Ok(Json(user))
}

/// Handler for PUT `/users/{user_id}/active`.
async fn handle_set_user_active(
    AxumState(app_state): AxumState<AppState>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<SetUserActiveRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(
        user_id = user_id,
        is_active = request.is_active,
        "Handling set_user_active request"
    );

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let user: UserInfo = set_user_active(&mut store, user_id, request, &actor, &client)?;
    drop(store);

    Ok(Json(user))
}

/// Handler for GET /users.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserInfo>>, HttpError> {
    info!("Handling list_users request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let mut store = app_state.store.lock().await;
    let users: Vec<UserInfo> = list_users(&mut store, &actor)?;
    drop(store);

    Ok(Json(users))
}

/// Handler for POST /repair.
async fn handle_repair(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Json<RepairResponse>, HttpError> {
    info!("Handling repair request");

    let actor: AuthenticatedActor = resolve_actor(&app_state, &headers).await?;
    let client: ClientContext = client_context(&headers);
    let mut store = app_state.store.lock().await;
    let report: RepairResponse = repair(&mut store, &actor, &client)?;
    drop(store);

    Ok(Json(report))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/orders", post(handle_create_order))
        .route("/orders", get(handle_list_orders))
        .route("/orders/sweep", post(handle_sweep_orders))
        .route("/orders/{order_id}", get(handle_get_order))
        .route("/orders/{order_id}/materials", put(handle_edit_order_materials))
        .route("/orders/{order_id}/cancel", post(handle_cancel_order))
        .route("/orders/{order_id}/dispatch", post(handle_dispatch_order))
        .route("/orders/{order_id}/pay", post(handle_mark_paid))
        .route(
            "/orders/{order_id}/tax_document",
            post(handle_set_tax_document),
        )
        .route("/materials", post(handle_create_material))
        .route("/materials", put(handle_update_material))
        .route("/materials", get(handle_list_materials))
        .route("/materials/restock", post(handle_restock_material))
        .route("/materials/low_stock", get(handle_low_stock_report))
        .route(
            "/materials/{kind}/{material_id}",
            delete(handle_delete_material),
        )
        .route("/products", post(handle_create_product))
        .route("/products", put(handle_update_product))
        .route("/products", get(handle_list_products))
        .route("/products/{product_id}", get(handle_get_product))
        .route("/products/{product_id}/recipe", put(handle_set_product_recipe))
        .route("/customers", post(handle_create_customer))
        .route("/customers", get(handle_list_customers))
        .route("/customers/{customer_id}", put(handle_update_customer))
        .route("/customers/{customer_id}", delete(handle_delete_customer))
        .route("/customers/{customer_id}", get(handle_get_customer))
        .route(
            "/customers/{customer_id}/orders",
            get(handle_list_customer_orders),
        )
        .route("/stock/import", post(handle_import_stock))
        .route("/stock/import/preview", post(handle_preview_stock_import))
        .route("/audit", get(handle_query_audit))
        .route("/users", post(handle_create_user))
        .route("/users", get(handle_list_users))
        .route("/users/{user_id}/active", put(handle_set_user_active))
        .route("/repair", post(handle_repair))
        .with_state(app_state)
}

/// Loads the business configuration from a JSON file, or the defaults.
fn load_config(path: Option<&str>) -> Result<BusinessConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading business configuration from: {}", path);
            let raw: String = std::fs::read_to_string(path)?;
            let config: BusinessConfig = serde_json::from_str(&raw)?;
            Ok(config)
        }
        None => Ok(BusinessConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Violeta Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let store: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let config: BusinessConfig = load_config(args.config.as_deref())?;

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(store)),
        config: Arc::new(config),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
