// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Fulfillment sub-state of an order.
///
/// The three time buckets (`ThisWeekPlan`, `Tomorrow`, `Today`) are driven
/// by the phase classifier; `Dispatched` and `Archived` are workflow
/// actions; `Cancelled` is reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    /// Order captured but not yet classified.
    #[default]
    Draft,
    /// Delivery more than one day out.
    ThisWeekPlan,
    /// Delivery tomorrow.
    Tomorrow,
    /// Delivery today.
    Today,
    /// Delivered by the workshop.
    Dispatched,
    /// Dispatched and past its delivery day. Terminal.
    Archived,
    /// Cancelled before dispatch. Terminal; freezes the other sub-states.
    Cancelled,
}

impl FulfillmentStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::ThisWeekPlan => "this_week_plan",
            Self::Tomorrow => "tomorrow",
            Self::Today => "today",
            Self::Dispatched => "dispatched",
            Self::Archived => "archived",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the Spanish display label shown in the back office.
    #[must_use]
    pub const fn display_label(&self) -> &'static str {
        match self {
            Self::Draft => "Borrador",
            Self::ThisWeekPlan => "Pedidos Semana",
            Self::Tomorrow => "Entregas para Mañana",
            Self::Today => "Entregas de Hoy",
            Self::Dispatched => "Despachados",
            Self::Archived => "Archivado",
            Self::Cancelled => "Cancelado",
        }
    }

    /// Returns whether no further transitions are allowed from this state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Archived | Self::Cancelled)
    }

    /// Returns whether this state is one of the three time buckets the
    /// reclassifier sweeps.
    #[must_use]
    pub const fn is_time_bucket(&self) -> bool {
        matches!(self, Self::ThisWeekPlan | Self::Tomorrow | Self::Today)
    }

    /// Validates a transition of the fulfillment machine.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` if the transition is not in
    /// the legal set.
    pub fn validate_transition(&self, to: Self) -> Result<(), DomainError> {
        let legal = match (self, to) {
            // Cancellation is legal from any non-terminal, pre-dispatch state.
            (from, Self::Cancelled) => !from.is_terminal() && *from != Self::Dispatched,
            (Self::Draft, to) => to.is_time_bucket(),
            (from, to) if from.is_time_bucket() && to.is_time_bucket() => true,
            (Self::Today, Self::Dispatched) => true,
            (Self::Dispatched, Self::Archived) => true,
            _ => false,
        };
        if legal {
            Ok(())
        } else {
            Err(DomainError::IllegalTransition {
                machine: "fulfillment",
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }
}

impl FromStr for FulfillmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "this_week_plan" => Ok(Self::ThisWeekPlan),
            "tomorrow" => Ok(Self::Tomorrow),
            "today" => Ok(Self::Today),
            "dispatched" => Ok(Self::Dispatched),
            "archived" => Ok(Self::Archived),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::LabelInvalid {
                field: "fulfillment_status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment sub-state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment not yet received.
    #[default]
    Pending,
    /// Payment received. Terminal.
    Paid,
}

impl PaymentStatus {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }

    /// Validates a transition of the payment machine.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` when moving out of `Paid`.
    pub fn validate_transition(&self, to: Self) -> Result<(), DomainError> {
        if *self == Self::Paid && to == Self::Pending {
            Err(DomainError::IllegalTransition {
                machine: "payment",
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        } else {
            Ok(())
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(DomainError::LabelInvalid {
                field: "payment_status",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
