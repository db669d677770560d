// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Closed label enumerations shared with the wire.
//!
//! Payment methods, tax documents, credit classes, and days of the week are
//! case- and spelling-sensitive Spanish labels. Unknown values are rejected
//! at the boundary with `LabelInvalid`; nothing free-form reaches storage.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Payment method label for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// No payment arrangement yet.
    #[default]
    Pendiente,
    /// Bank transfer to the BICE account.
    TransferenciaBice,
    /// Bank transfer to the Santander account.
    TransferenciaSantander,
    /// Bank transfer to the Itaú account.
    TransferenciaItau,
    /// Transfer promised but not yet received.
    FaltaTransferencia,
    /// Payment confirmed by the owner.
    PagoConfirmado,
    /// Card payment.
    PagoConTarjeta,
}

impl PaymentMethod {
    /// Returns the wire label for this payment method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "Pendiente",
            Self::TransferenciaBice => "Tr. BICE",
            Self::TransferenciaSantander => "Tr. Santander",
            Self::TransferenciaItau => "Tr. Itaú",
            Self::FaltaTransferencia => "Tr. Falta transferencia",
            Self::PagoConfirmado => "Pago confirmado",
            Self::PagoConTarjeta => "Pago con tarjeta",
        }
    }

    /// Returns whether the label names a bank-transfer method.
    #[must_use]
    pub const fn is_bank_transfer(&self) -> bool {
        matches!(
            self,
            Self::TransferenciaBice | Self::TransferenciaSantander | Self::TransferenciaItau
        )
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pendiente" => Ok(Self::Pendiente),
            "Tr. BICE" => Ok(Self::TransferenciaBice),
            "Tr. Santander" => Ok(Self::TransferenciaSantander),
            "Tr. Itaú" => Ok(Self::TransferenciaItau),
            "Tr. Falta transferencia" => Ok(Self::FaltaTransferencia),
            "Pago confirmado" => Ok(Self::PagoConfirmado),
            "Pago con tarjeta" => Ok(Self::PagoConTarjeta),
            _ => Err(DomainError::LabelInvalid {
                field: "payment_method",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tax-document sub-state of an order.
///
/// The state doubles as the wire label, so transitions are expressed
/// directly on this enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaxDocument {
    /// No document issued and none requested yet.
    #[default]
    NotIssued,
    /// A boleta (receipt) must be issued.
    ToIssueReceipt,
    /// A factura (invoice) must be issued.
    ToIssueInvoice,
    /// A boleta has been issued.
    ReceiptIssued,
    /// A factura has been issued.
    InvoiceIssued,
    /// The order does not require a tax document.
    NotRequired,
}

impl TaxDocument {
    /// Returns the wire label for this tax-document state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotIssued => "Falta boleta o factura",
            Self::ToIssueReceipt => "Hacer boleta",
            Self::ToIssueInvoice => "Hacer factura",
            Self::ReceiptIssued => "Boleta emitida",
            Self::InvoiceIssued => "Factura emitida",
            Self::NotRequired => "No requiere",
        }
    }

    /// Returns whether a document number is required in this state.
    #[must_use]
    pub const fn is_issued(&self) -> bool {
        matches!(self, Self::ReceiptIssued | Self::InvoiceIssued)
    }

    /// Validates a transition of the tax-document machine.
    ///
    /// Issued states are reachable only from their matching to-issue state
    /// or from `NotIssued`; `NotRequired` is reachable from any non-issued
    /// state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IllegalTransition` if the transition is not in
    /// the legal set.
    pub fn validate_transition(&self, to: Self) -> Result<(), DomainError> {
        let legal = match (self, to) {
            (from, to) if *from == to => true,
            (Self::ReceiptIssued | Self::InvoiceIssued, _) => false,
            (_, Self::ReceiptIssued) => {
                matches!(self, Self::ToIssueReceipt | Self::NotIssued)
            }
            (_, Self::InvoiceIssued) => {
                matches!(self, Self::ToIssueInvoice | Self::NotIssued)
            }
            _ => true,
        };
        if legal {
            Ok(())
        } else {
            Err(DomainError::IllegalTransition {
                machine: "tax_document",
                from: self.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }
}

impl FromStr for TaxDocument {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Falta boleta o factura" => Ok(Self::NotIssued),
            "Hacer boleta" => Ok(Self::ToIssueReceipt),
            "Hacer factura" => Ok(Self::ToIssueInvoice),
            "Boleta emitida" => Ok(Self::ReceiptIssued),
            "Factura emitida" => Ok(Self::InvoiceIssued),
            "No requiere" => Ok(Self::NotRequired),
            _ => Err(DomainError::LabelInvalid {
                field: "tax_document",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TaxDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Customer credit class determining the payment due-date offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CreditClass {
    /// New customer, payment due immediately.
    #[default]
    Nuevo,
    /// Loyal customer, 15 days of credit.
    Fiel,
    /// Compliant payer, 30 days of credit.
    Cumplidor,
    /// Non-compliant payer, no credit.
    NoCumplidor,
    /// VIP customer, 45 days of credit.
    Vip,
    /// Occasional customer, 7 days of credit.
    Ocasional,
}

impl CreditClass {
    /// Returns the wire label for this credit class.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nuevo => "Nuevo",
            Self::Fiel => "Fiel",
            Self::Cumplidor => "Cumplidor",
            Self::NoCumplidor => "No Cumplidor",
            Self::Vip => "VIP",
            Self::Ocasional => "Ocasional",
        }
    }

    /// Returns the credit term in days for this class.
    #[must_use]
    pub const fn credit_days(&self) -> i64 {
        match self {
            Self::Nuevo | Self::NoCumplidor => 0,
            Self::Fiel => 15,
            Self::Cumplidor => 30,
            Self::Vip => 45,
            Self::Ocasional => 7,
        }
    }
}

impl FromStr for CreditClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Nuevo" => Ok(Self::Nuevo),
            "Fiel" => Ok(Self::Fiel),
            "Cumplidor" => Ok(Self::Cumplidor),
            "No Cumplidor" => Ok(Self::NoCumplidor),
            "VIP" => Ok(Self::Vip),
            "Ocasional" => Ok(Self::Ocasional),
            _ => Err(DomainError::LabelInvalid {
                field: "credit_class",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for CreditClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Day of the week, Spanish uppercase wire labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Lunes,
    Martes,
    Miercoles,
    Jueves,
    Viernes,
    Sabado,
    Domingo,
}

impl DayOfWeek {
    /// Returns the wire label for this day.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lunes => "LUNES",
            Self::Martes => "MARTES",
            Self::Miercoles => "MIERCOLES",
            Self::Jueves => "JUEVES",
            Self::Viernes => "VIERNES",
            Self::Sabado => "SABADO",
            Self::Domingo => "DOMINGO",
        }
    }

    /// Converts from a chrono weekday.
    #[must_use]
    pub const fn from_weekday(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Self::Lunes,
            chrono::Weekday::Tue => Self::Martes,
            chrono::Weekday::Wed => Self::Miercoles,
            chrono::Weekday::Thu => Self::Jueves,
            chrono::Weekday::Fri => Self::Viernes,
            chrono::Weekday::Sat => Self::Sabado,
            chrono::Weekday::Sun => Self::Domingo,
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LUNES" => Ok(Self::Lunes),
            "MARTES" => Ok(Self::Martes),
            "MIERCOLES" => Ok(Self::Miercoles),
            "JUEVES" => Ok(Self::Jueves),
            "VIERNES" => Ok(Self::Viernes),
            "SABADO" => Ok(Self::Sabado),
            "DOMINGO" => Ok(Self::Domingo),
            _ => Err(DomainError::LabelInvalid {
                field: "day_of_week",
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
