// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use violeta_audit::{Actor, AuditAction, AuditRecord, ClientContext, EntityKind};
use violeta_domain::{
    DomainError, FulfillmentStatus, Material, MaterialRef, MaterialRole, Order, OrderMaterial,
    PaymentMethod, PaymentStatus, TaxDocument, business_date, due_date, phase_of, resolve_recipe,
    validate_order_fields, validate_quantity,
};

use crate::command::{Command, OrderIntake};
use crate::error::CoreError;
use crate::ledger::{OverdrawPolicy, consume, find_material_mut, release, reserve, restock};
use crate::state::{OrderContext, TransitionResult};

/// Applies a command to an order context, producing the rows to persist
/// and the audit record to append after commit.
///
/// The engine is pure with respect to the store: the caller loads the
/// context inside a transaction and persists the result before commit.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` when the command breaks a domain
/// rule; the caller must roll back the enclosing transaction.
pub fn apply(
    ctx: &OrderContext,
    command: Command,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::CreateOrder { intake } => apply_create(ctx, intake, actor, client),
        Command::EditMaterials { materials } => apply_edit(ctx, materials, actor, client),
        Command::Cancel { reason } => apply_cancel(ctx, reason, actor, client),
        Command::Dispatch { policy } => apply_dispatch(ctx, policy, actor, client),
        Command::MarkPaid { method } => apply_mark_paid(ctx, method, actor, client),
        Command::SetTaxDocument {
            document,
            document_number,
        } => apply_tax_document(ctx, document, document_number, actor, client),
        Command::Reclassify { to } => apply_reclassify(ctx, to, actor, client),
    }
}

fn apply_create(
    ctx: &OrderContext,
    intake: OrderIntake,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let Some((product, recipe)) = ctx.product.as_ref() else {
        return Err(DomainError::Validation {
            field: "product",
            reason: String::from("a product is required to create an order"),
        }
        .into());
    };
    if ctx.customer.customer_id != Some(intake.customer_id) {
        return Err(DomainError::NotFound {
            entity: "customer",
            id: intake.customer_id.to_string(),
        }
        .into());
    }

    let required: BTreeMap<MaterialRef, i64> = resolve_recipe(product, recipe, intake.quantity)?;

    let mut materials: Vec<Material> = ctx.materials.clone();
    let mut order_materials: Vec<OrderMaterial> = Vec::with_capacity(required.len());
    for (reference, quantity) in &required {
        let material: &mut Material = find_material_mut(&mut materials, *reference)?;
        if intake.is_event {
            reserve(material, *quantity)?;
        } else {
            consume(material, *quantity, OverdrawPolicy::Strict)?;
        }
        order_materials.push(OrderMaterial {
            material: *reference,
            quantity: *quantity,
            role: MaterialRole::Recipe,
        });
    }

    let order: Order = Order {
        order_id: None,
        // Assigned by the store on insert.
        order_number: String::new(),
        customer_id: intake.customer_id,
        delivery_at: intake.delivery_at,
        delivery_address: intake.delivery_address,
        comuna: intake.comuna,
        arrangement_price: intake.arrangement_price,
        delivery_price: intake.delivery_price,
        fulfillment: phase_of(intake.delivery_at, ctx.now),
        payment: PaymentStatus::Pending,
        payment_method: intake.payment_method,
        tax_document: intake.tax_document,
        document_number: None,
        photo_url: intake.photo_url,
        is_event: intake.is_event,
        event_type: intake.event_type,
        reason: None,
        payment_due_date: due_date(business_date(ctx.now), ctx.customer.credit_class),
        created_at: ctx.now,
        dispatched_at: None,
        archived_at: None,
        cancelled_at: None,
        paid_at: None,
    };
    validate_order_fields(&order)?;

    let details: serde_json::Value = serde_json::json!({
        "customer_id": order.customer_id,
        "product": product.name,
        "quantity": intake.quantity,
        "total": order.total_price(),
        "is_event": order.is_event,
        "fulfillment": order.fulfillment.as_str(),
        "payment_due_date": order.payment_due_date.to_string(),
    });
    let audit: AuditRecord = AuditRecord::new(
        actor,
        AuditAction::Create,
        EntityKind::Order,
        None,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials,
        materials: changed_materials(&ctx.materials, materials),
        audit,
    })
}

fn apply_edit(
    ctx: &OrderContext,
    new_set: Vec<OrderMaterial>,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let order: Order = current_order(ctx)?;
    if order.fulfillment.is_terminal() || order.fulfillment == FulfillmentStatus::Dispatched {
        return Err(illegal_fulfillment(&order, "edit").into());
    }

    let mut desired: BTreeMap<(MaterialRef, MaterialRole), i64> = BTreeMap::new();
    for row in &new_set {
        validate_quantity("quantity", row.quantity)?;
        if desired.insert((row.material, row.role), row.quantity).is_some() {
            return Err(DomainError::Validation {
                field: "materials",
                reason: format!("duplicate entry for material {}", row.material),
            }
            .into());
        }
    }
    let mut existing: BTreeMap<(MaterialRef, MaterialRole), i64> = BTreeMap::new();
    for row in &ctx.order_materials {
        existing.insert((row.material, row.role), row.quantity);
    }

    let mut materials: Vec<Material> = ctx.materials.clone();
    let mut added: Vec<serde_json::Value> = Vec::new();
    let mut removed: Vec<serde_json::Value> = Vec::new();
    let keys: std::collections::BTreeSet<(MaterialRef, MaterialRole)> =
        desired.keys().chain(existing.keys()).copied().collect();
    for key in keys {
        let before: i64 = existing.get(&key).copied().unwrap_or(0);
        let after: i64 = desired.get(&key).copied().unwrap_or(0);
        let delta: i64 = after - before;
        if delta == 0 {
            continue;
        }
        let material: &mut Material = find_material_mut(&mut materials, key.0)?;
        if delta > 0 {
            if order.is_event {
                reserve(material, delta)?;
            } else {
                consume(material, delta, OverdrawPolicy::Strict)?;
            }
            added.push(serde_json::json!({
                "material": key.0.to_string(),
                "quantity": delta,
            }));
        } else {
            if order.is_event {
                release(material, -delta);
            } else {
                restock(material, -delta)?;
            }
            removed.push(serde_json::json!({
                "material": key.0.to_string(),
                "quantity": -delta,
            }));
        }
    }

    let details: serde_json::Value = serde_json::json!({
        "added": added,
        "removed": removed,
    });
    let audit: AuditRecord = AuditRecord::new(
        actor,
        AuditAction::Edit,
        EntityKind::Order,
        order.order_id,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials: new_set,
        materials: changed_materials(&ctx.materials, materials),
        audit,
    })
}

fn apply_cancel(
    ctx: &OrderContext,
    reason: String,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let mut order: Order = current_order(ctx)?;
    order
        .fulfillment
        .validate_transition(FulfillmentStatus::Cancelled)?;

    let mut materials: Vec<Material> = ctx.materials.clone();
    for row in &ctx.order_materials {
        let material: &mut Material = find_material_mut(&mut materials, row.material)?;
        if order.is_event {
            release(material, row.quantity);
        } else {
            restock(material, row.quantity)?;
        }
    }

    let details: serde_json::Value = serde_json::json!({
        "from": order.fulfillment.as_str(),
        "reason": reason,
        "restocked_materials": ctx.order_materials.len(),
    });
    order.fulfillment = FulfillmentStatus::Cancelled;
    order.cancelled_at = Some(ctx.now);
    order.reason = Some(reason);

    let audit: AuditRecord = AuditRecord::new(
        actor,
        AuditAction::Cancel,
        EntityKind::Order,
        order.order_id,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials: ctx.order_materials.clone(),
        materials: changed_materials(&ctx.materials, materials),
        audit,
    })
}

fn apply_dispatch(
    ctx: &OrderContext,
    policy: OverdrawPolicy,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let mut order: Order = current_order(ctx)?;
    order
        .fulfillment
        .validate_transition(FulfillmentStatus::Dispatched)?;

    // Event orders consume their held materials at dispatch; normal orders
    // consumed at intake.
    let mut materials: Vec<Material> = ctx.materials.clone();
    let mut overdrawn: Vec<String> = Vec::new();
    if order.is_event {
        for row in &ctx.order_materials {
            let material: &mut Material = find_material_mut(&mut materials, row.material)?;
            release(material, row.quantity);
            consume(material, row.quantity, policy)?;
            if material.on_hand < 0 {
                overdrawn.push(material.name.clone());
            }
        }
    }

    order.fulfillment = FulfillmentStatus::Dispatched;
    order.dispatched_at = Some(ctx.now);

    let overdraw: bool = !overdrawn.is_empty();
    let details: serde_json::Value = serde_json::json!({
        "is_event": order.is_event,
        "overdraw": overdraw,
        "overdrawn_materials": overdrawn,
    });
    let action: AuditAction = if overdraw {
        AuditAction::ConsumeOverdraw
    } else {
        AuditAction::Dispatch
    };
    let audit: AuditRecord = AuditRecord::new(
        actor,
        action,
        EntityKind::Order,
        order.order_id,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials: ctx.order_materials.clone(),
        materials: changed_materials(&ctx.materials, materials),
        audit,
    })
}

fn apply_mark_paid(
    ctx: &OrderContext,
    method: PaymentMethod,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let mut order: Order = current_order(ctx)?;
    if order.fulfillment == FulfillmentStatus::Cancelled {
        return Err(illegal_frozen(&order, "payment").into());
    }
    if method == PaymentMethod::Pendiente {
        return Err(DomainError::Validation {
            field: "payment_method",
            reason: String::from("a concrete payment method is required to mark paid"),
        }
        .into());
    }
    order.payment.validate_transition(PaymentStatus::Paid)?;

    order.payment = PaymentStatus::Paid;
    order.payment_method = method;
    order.paid_at = Some(ctx.now);

    let details: serde_json::Value = serde_json::json!({
        "method": method.as_str(),
        "total": order.total_price(),
    });
    let audit: AuditRecord = AuditRecord::new(
        actor,
        AuditAction::MarkPaid,
        EntityKind::Order,
        order.order_id,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials: ctx.order_materials.clone(),
        materials: Vec::new(),
        audit,
    })
}

fn apply_tax_document(
    ctx: &OrderContext,
    document: TaxDocument,
    document_number: Option<String>,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let mut order: Order = current_order(ctx)?;
    if order.fulfillment == FulfillmentStatus::Cancelled {
        return Err(illegal_frozen(&order, "tax_document").into());
    }
    order.tax_document.validate_transition(document)?;

    let from: &'static str = order.tax_document.as_str();
    order.tax_document = document;
    if document_number.is_some() {
        order.document_number = document_number;
    }
    validate_order_fields(&order)?;

    let details: serde_json::Value = serde_json::json!({
        "from": from,
        "to": document.as_str(),
        "document_number": order.document_number,
    });
    let audit: AuditRecord = AuditRecord::new(
        actor,
        AuditAction::TaxDocument,
        EntityKind::Order,
        order.order_id,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials: ctx.order_materials.clone(),
        materials: Vec::new(),
        audit,
    })
}

fn apply_reclassify(
    ctx: &OrderContext,
    to: FulfillmentStatus,
    actor: Actor,
    client: ClientContext,
) -> Result<TransitionResult, CoreError> {
    let mut order: Order = current_order(ctx)?;
    order.fulfillment.validate_transition(to)?;

    let from: &'static str = order.fulfillment.as_str();
    order.fulfillment = to;
    if to == FulfillmentStatus::Archived {
        order.archived_at = Some(ctx.now);
    }

    let details: serde_json::Value = serde_json::json!({
        "from": from,
        "to": to.as_str(),
    });
    let audit: AuditRecord = AuditRecord::new(
        actor,
        AuditAction::Reclassify,
        EntityKind::Order,
        order.order_id,
        details,
        client,
    );

    Ok(TransitionResult {
        order,
        order_materials: ctx.order_materials.clone(),
        materials: Vec::new(),
        audit,
    })
}

fn current_order(ctx: &OrderContext) -> Result<Order, DomainError> {
    ctx.order.clone().ok_or(DomainError::NotFound {
        entity: "order",
        id: String::from("<none>"),
    })
}

fn illegal_fulfillment(order: &Order, to: &str) -> DomainError {
    DomainError::IllegalTransition {
        machine: "fulfillment",
        from: order.fulfillment.as_str().to_string(),
        to: to.to_string(),
    }
}

fn illegal_frozen(order: &Order, machine: &'static str) -> DomainError {
    DomainError::IllegalTransition {
        machine,
        from: order.fulfillment.as_str().to_string(),
        to: String::from("<frozen by cancellation>"),
    }
}

/// Returns only the material rows whose counters changed.
fn changed_materials(before: &[Material], after: Vec<Material>) -> Vec<Material> {
    after
        .into_iter()
        .filter(|row| {
            before
                .iter()
                .find(|b| b.kind == row.kind && b.material_id == row.material_id)
                .is_none_or(|b| b != row)
        })
        .collect()
}
