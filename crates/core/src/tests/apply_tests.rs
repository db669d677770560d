// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, NaiveDate, Utc};
use violeta_audit::AuditAction;
use violeta_domain::{
    DomainError, FulfillmentStatus, MaterialRole, Order, OrderMaterial, PaymentMethod,
    PaymentStatus, TaxDocument,
};

use crate::command::Command;
use crate::error::CoreError;
use crate::ledger::OverdrawPolicy;
use crate::state::{OrderContext, TransitionResult};
use crate::tests::helpers::{
    create_intake_context, create_test_actor, create_test_client, create_test_customer,
    create_test_intake, create_test_rose, rose_ref, santiago,
};
use crate::apply;

fn apply_ok(ctx: &OrderContext, command: Command) -> TransitionResult {
    apply(ctx, command, create_test_actor(), create_test_client()).unwrap()
}

fn apply_err(ctx: &OrderContext, command: Command) -> CoreError {
    apply(ctx, command, create_test_actor(), create_test_client()).unwrap_err()
}

fn persisted(mut result: TransitionResult, order_id: i64) -> (Order, Vec<OrderMaterial>) {
    result.order.order_id = Some(order_id);
    result.order.order_number = String::from("V000001");
    (result.order, result.order_materials)
}

#[test]
fn test_create_normal_order_consumes_stock_and_classifies() {
    // Fiel customer, ordered 2025-03-03 for delivery 2025-03-05, recipe
    // rose x12 against 50 on hand.
    let now: DateTime<Utc> = santiago(2025, 3, 3, 10, 0);
    let ctx: OrderContext = create_intake_context(50, now);
    let command: Command = Command::CreateOrder {
        intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
    };

    let result: TransitionResult = apply_ok(&ctx, command);

    assert_eq!(result.order.fulfillment, FulfillmentStatus::ThisWeekPlan);
    assert_eq!(
        result.order.payment_due_date,
        NaiveDate::from_ymd_opt(2025, 3, 18).unwrap()
    );
    assert_eq!(result.order.total_price(), 30_000);
    assert_eq!(result.materials.len(), 1);
    assert_eq!(result.materials[0].on_hand, 38);
    assert_eq!(result.materials[0].reserved_for_event, 0);
    assert_eq!(result.order_materials.len(), 1);
    assert_eq!(result.order_materials[0].role, MaterialRole::Recipe);
    assert_eq!(result.audit.action, AuditAction::Create);
}

#[test]
fn test_create_fails_on_insufficient_stock() {
    let now: DateTime<Utc> = santiago(2025, 3, 3, 10, 0);
    let ctx: OrderContext = create_intake_context(10, now);
    let command: Command = Command::CreateOrder {
        intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
    };

    let error: CoreError = apply_err(&ctx, command);

    assert!(matches!(
        error,
        CoreError::DomainViolation(DomainError::InsufficientStock {
            requested: 12,
            available: 10,
            ..
        })
    ));
}

#[test]
fn test_create_event_order_reserves_instead_of_consuming() {
    let now: DateTime<Utc> = santiago(2025, 3, 3, 10, 0);
    let ctx: OrderContext = create_intake_context(50, now);
    let mut intake = create_test_intake(santiago(2025, 3, 20, 14, 0));
    intake.is_event = true;
    intake.event_type = Some(String::from("matrimonio"));

    let result: TransitionResult = apply_ok(&ctx, Command::CreateOrder { intake });

    assert_eq!(result.materials[0].on_hand, 50);
    assert_eq!(result.materials[0].reserved_for_event, 12);
}

#[test]
fn test_create_for_delivery_today_lands_in_today() {
    let now: DateTime<Utc> = santiago(2025, 3, 3, 8, 0);
    let ctx: OrderContext = create_intake_context(50, now);
    let command: Command = Command::CreateOrder {
        intake: create_test_intake(santiago(2025, 3, 3, 18, 0)),
    };

    let result: TransitionResult = apply_ok(&ctx, command);

    assert_eq!(result.order.fulfillment, FulfillmentStatus::Today);
}

#[test]
fn test_cancel_after_consume_restocks() {
    let now: DateTime<Utc> = santiago(2025, 3, 3, 10, 0);
    let intake_ctx: OrderContext = create_intake_context(50, now);
    let created: TransitionResult = apply_ok(
        &intake_ctx,
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    );
    let (order, order_materials) = persisted(created.clone(), 1);

    let cancel_ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        order_materials,
        created.materials,
        santiago(2025, 3, 4, 9, 0),
    );
    let result: TransitionResult = apply_ok(
        &cancel_ctx,
        Command::Cancel {
            reason: String::from("cliente desistió"),
        },
    );

    assert_eq!(result.order.fulfillment, FulfillmentStatus::Cancelled);
    assert!(result.order.cancelled_at.is_some());
    assert_eq!(result.materials[0].on_hand, 50);
    assert_eq!(result.audit.action, AuditAction::Cancel);
}

#[test]
fn test_event_create_then_cancel_restores_counters() {
    let now: DateTime<Utc> = santiago(2025, 3, 3, 10, 0);
    let ctx: OrderContext = create_intake_context(50, now);
    let mut intake = create_test_intake(santiago(2025, 3, 20, 14, 0));
    intake.is_event = true;
    intake.event_type = Some(String::from("matrimonio"));
    let created: TransitionResult = apply_ok(&ctx, Command::CreateOrder { intake });
    let (order, order_materials) = persisted(created.clone(), 1);

    let cancel_ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        order_materials,
        created.materials,
        santiago(2025, 3, 4, 9, 0),
    );
    let result: TransitionResult = apply_ok(
        &cancel_ctx,
        Command::Cancel {
            reason: String::from("evento suspendido"),
        },
    );

    assert_eq!(result.materials[0].on_hand, 50);
    assert_eq!(result.materials[0].reserved_for_event, 0);
}

#[test]
fn test_cancel_dispatched_order_is_illegal() {
    let now: DateTime<Utc> = santiago(2025, 3, 5, 18, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 5, 8, 0)),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);
    order.fulfillment = FulfillmentStatus::Dispatched;

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        Vec::new(),
        vec![create_test_rose(38)],
        now,
    );
    let error: CoreError = apply_err(
        &ctx,
        Command::Cancel {
            reason: String::from("tarde"),
        },
    );

    assert!(matches!(
        error,
        CoreError::DomainViolation(DomainError::IllegalTransition {
            machine: "fulfillment",
            ..
        })
    ));
}

#[test]
fn test_dispatch_requires_today() {
    let now: DateTime<Utc> = santiago(2025, 3, 3, 10, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, now),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        Vec::new(),
        vec![create_test_rose(38)],
        now,
    );
    let error: CoreError = apply_err(
        &ctx,
        Command::Dispatch {
            policy: OverdrawPolicy::Strict,
        },
    );

    assert!(matches!(
        error,
        CoreError::DomainViolation(DomainError::IllegalTransition { .. })
    ));
}

#[test]
fn test_dispatch_event_order_consumes_reservation() {
    let now: DateTime<Utc> = santiago(2025, 3, 20, 9, 0);
    let mut rose = create_test_rose(50);
    rose.reserved_for_event = 12;
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: {
                let mut intake = create_test_intake(santiago(2025, 3, 20, 14, 0));
                intake.is_event = true;
                intake.event_type = Some(String::from("matrimonio"));
                intake
            },
        },
    )
    .order;
    order.order_id = Some(1);
    order.fulfillment = FulfillmentStatus::Today;

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        vec![OrderMaterial {
            material: rose_ref(),
            quantity: 12,
            role: MaterialRole::Recipe,
        }],
        vec![rose],
        now,
    );
    let result: TransitionResult = apply_ok(
        &ctx,
        Command::Dispatch {
            policy: OverdrawPolicy::Strict,
        },
    );

    assert_eq!(result.order.fulfillment, FulfillmentStatus::Dispatched);
    assert!(result.order.dispatched_at.is_some());
    assert_eq!(result.materials[0].on_hand, 38);
    assert_eq!(result.materials[0].reserved_for_event, 0);
    assert_eq!(result.audit.action, AuditAction::Dispatch);
}

#[test]
fn test_dispatch_overdraw_is_audited_as_override() {
    let now: DateTime<Utc> = santiago(2025, 3, 20, 9, 0);
    let mut rose = create_test_rose(5);
    rose.reserved_for_event = 5;
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: {
                let mut intake = create_test_intake(santiago(2025, 3, 20, 14, 0));
                intake.is_event = true;
                intake.event_type = Some(String::from("matrimonio"));
                intake
            },
        },
    )
    .order;
    order.order_id = Some(1);
    order.fulfillment = FulfillmentStatus::Today;

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        vec![OrderMaterial {
            material: rose_ref(),
            quantity: 12,
            role: MaterialRole::Recipe,
        }],
        vec![rose],
        now,
    );
    let result: TransitionResult = apply_ok(
        &ctx,
        Command::Dispatch {
            policy: OverdrawPolicy::AllowOverdraw,
        },
    );

    assert_eq!(result.materials[0].on_hand, -7);
    assert_eq!(result.audit.action, AuditAction::ConsumeOverdraw);
}

#[test]
fn test_edit_materials_applies_diff_strictly() {
    let now: DateTime<Utc> = santiago(2025, 3, 4, 10, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        vec![OrderMaterial {
            material: rose_ref(),
            quantity: 12,
            role: MaterialRole::Recipe,
        }],
        vec![create_test_rose(38)],
        now,
    );
    // Bump the roses to 15 and add 3 extra.
    let result: TransitionResult = apply_ok(
        &ctx,
        Command::EditMaterials {
            materials: vec![
                OrderMaterial {
                    material: rose_ref(),
                    quantity: 15,
                    role: MaterialRole::Recipe,
                },
                OrderMaterial {
                    material: rose_ref(),
                    quantity: 3,
                    role: MaterialRole::Extra,
                },
            ],
        },
    );

    assert_eq!(result.materials[0].on_hand, 38 - 3 - 3);
    assert_eq!(result.order_materials.len(), 2);
    assert_eq!(result.audit.action, AuditAction::Edit);
}

#[test]
fn test_edit_rolls_back_when_stock_is_short() {
    let now: DateTime<Utc> = santiago(2025, 3, 4, 10, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        vec![OrderMaterial {
            material: rose_ref(),
            quantity: 12,
            role: MaterialRole::Recipe,
        }],
        vec![create_test_rose(2)],
        now,
    );
    let error: CoreError = apply_err(
        &ctx,
        Command::EditMaterials {
            materials: vec![OrderMaterial {
                material: rose_ref(),
                quantity: 20,
                role: MaterialRole::Recipe,
            }],
        },
    );

    // The engine returns an error; the caller's transaction rollback
    // discards any partial mutation.
    assert!(matches!(
        error,
        CoreError::DomainViolation(DomainError::InsufficientStock { .. })
    ));
}

#[test]
fn test_mark_paid_requires_concrete_method() {
    let now: DateTime<Utc> = santiago(2025, 3, 4, 10, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        Vec::new(),
        Vec::new(),
        now,
    );
    let error: CoreError = apply_err(
        &ctx,
        Command::MarkPaid {
            method: PaymentMethod::Pendiente,
        },
    );

    assert!(matches!(
        error,
        CoreError::DomainViolation(DomainError::Validation {
            field: "payment_method",
            ..
        })
    ));

    let result: TransitionResult = apply_ok(
        &ctx,
        Command::MarkPaid {
            method: PaymentMethod::TransferenciaBice,
        },
    );

    assert_eq!(result.order.payment, PaymentStatus::Paid);
    assert_eq!(result.order.payment_method, PaymentMethod::TransferenciaBice);
    assert!(result.order.paid_at.is_some());
}

#[test]
fn test_cancelled_order_freezes_payment_and_tax() {
    let now: DateTime<Utc> = santiago(2025, 3, 4, 10, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);
    order.fulfillment = FulfillmentStatus::Cancelled;

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        Vec::new(),
        Vec::new(),
        now,
    );

    assert!(matches!(
        apply_err(
            &ctx,
            Command::MarkPaid {
                method: PaymentMethod::PagoConTarjeta,
            },
        ),
        CoreError::DomainViolation(DomainError::IllegalTransition {
            machine: "payment",
            ..
        })
    ));
    assert!(matches!(
        apply_err(
            &ctx,
            Command::SetTaxDocument {
                document: TaxDocument::NotRequired,
                document_number: None,
            },
        ),
        CoreError::DomainViolation(DomainError::IllegalTransition {
            machine: "tax_document",
            ..
        })
    ));
}

#[test]
fn test_issuing_tax_document_requires_number() {
    let now: DateTime<Utc> = santiago(2025, 3, 4, 10, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: {
                let mut intake = create_test_intake(santiago(2025, 3, 5, 14, 0));
                intake.tax_document = TaxDocument::ToIssueReceipt;
                intake
            },
        },
    )
    .order;
    order.order_id = Some(1);

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        Vec::new(),
        Vec::new(),
        now,
    );

    assert!(matches!(
        apply_err(
            &ctx,
            Command::SetTaxDocument {
                document: TaxDocument::ReceiptIssued,
                document_number: None,
            },
        ),
        CoreError::DomainViolation(DomainError::Validation {
            field: "document_number",
            ..
        })
    ));

    let result: TransitionResult = apply_ok(
        &ctx,
        Command::SetTaxDocument {
            document: TaxDocument::ReceiptIssued,
            document_number: Some(String::from("B-10422")),
        },
    );

    assert_eq!(result.order.tax_document, TaxDocument::ReceiptIssued);
    assert_eq!(result.order.document_number, Some(String::from("B-10422")));
    assert_eq!(result.audit.action, AuditAction::TaxDocument);
}

#[test]
fn test_reclassify_archives_dispatched_order() {
    let now: DateTime<Utc> = santiago(2025, 3, 6, 6, 0);
    let mut order: Order = apply_ok(
        &create_intake_context(50, santiago(2025, 3, 3, 10, 0)),
        Command::CreateOrder {
            intake: create_test_intake(santiago(2025, 3, 5, 14, 0)),
        },
    )
    .order;
    order.order_id = Some(1);
    order.fulfillment = FulfillmentStatus::Dispatched;

    let ctx: OrderContext = OrderContext::for_order(
        create_test_customer(),
        order,
        Vec::new(),
        Vec::new(),
        now,
    );
    let result: TransitionResult = apply_ok(
        &ctx,
        Command::Reclassify {
            to: FulfillmentStatus::Archived,
        },
    );

    assert_eq!(result.order.fulfillment, FulfillmentStatus::Archived);
    assert!(result.order.archived_at.is_some());
    assert_eq!(result.audit.action, AuditAction::Reclassify);
}
