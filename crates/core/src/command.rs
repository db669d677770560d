// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use violeta_domain::{
    FulfillmentStatus, OrderMaterial, PaymentMethod, TaxDocument,
};

use crate::ledger::OverdrawPolicy;

/// Intake attributes for a new order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderIntake {
    /// The ordering customer.
    pub customer_id: i64,
    /// How many units of the chosen product the arrangement contains.
    pub quantity: i64,
    /// When the arrangement is due at the recipient.
    pub delivery_at: DateTime<Utc>,
    /// Delivery street address.
    pub delivery_address: String,
    /// Resolved comuna, when known.
    pub comuna: Option<String>,
    /// Arrangement price in Chilean pesos.
    pub arrangement_price: i64,
    /// Delivery price in Chilean pesos.
    pub delivery_price: i64,
    /// Payment method label.
    pub payment_method: PaymentMethod,
    /// Requested tax-document state.
    pub tax_document: TaxDocument,
    /// Optional reference photo URL.
    pub photo_url: Option<String>,
    /// Event orders reserve materials instead of consuming them.
    pub is_event: bool,
    /// Event type, required when `is_event`.
    pub event_type: Option<String>,
}

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request a change to an order or to stock
/// levels. Every applied command produces exactly one audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new order from intake attributes.
    ///
    /// The context must carry the chosen product and its recipe entries.
    CreateOrder {
        /// The intake attributes.
        intake: OrderIntake,
    },
    /// Replace the order's material set with a new one.
    ///
    /// Removed quantities are restocked and added quantities consumed
    /// under the strict policy; a partial failure rolls back the whole
    /// edit.
    EditMaterials {
        /// The desired material set after the edit.
        materials: Vec<OrderMaterial>,
    },
    /// Cancel a not-yet-dispatched order, restocking its materials.
    Cancel {
        /// Why the order was cancelled.
        reason: String,
    },
    /// Dispatch an order that is due today.
    ///
    /// Event orders consume their reserved materials at this point.
    Dispatch {
        /// Overdraw policy for the consumption of event reservations.
        policy: OverdrawPolicy,
    },
    /// Mark the order paid with the given method.
    MarkPaid {
        /// The payment method; must not be `Pendiente`.
        method: PaymentMethod,
    },
    /// Move the tax-document machine to a new state.
    SetTaxDocument {
        /// The target state.
        document: TaxDocument,
        /// Document number, required for issued states.
        document_number: Option<String>,
    },
    /// Move the order to a new fulfillment phase.
    ///
    /// Used by the bulk reclassifier; also archives dispatched orders.
    Reclassify {
        /// The target phase.
        to: FulfillmentStatus,
    },
}
