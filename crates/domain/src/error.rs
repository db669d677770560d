// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
///
/// Every variant maps to exactly one taxon label (see [`DomainError::taxon`]),
/// which is what callers surface at the API boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An inventory operation would leave on-hand stock below zero under
    /// the strict overdraw policy.
    InsufficientStock {
        /// The material display name.
        material: String,
        /// The quantity that was requested.
        requested: i64,
        /// The quantity actually available (on-hand minus reserved).
        available: i64,
    },
    /// A release exceeded the reserved quantity. The release is clamped at
    /// zero; this error is reported but never aborts the caller.
    ReservationUnderflow {
        /// The material display name.
        material: String,
        /// The quantity that was asked to be released.
        requested: i64,
        /// The quantity actually reserved.
        reserved: i64,
    },
    /// A product has no recipe entries.
    RecipeEmpty {
        /// The product display name.
        product: String,
    },
    /// Two recipe entries for the same product share a material reference.
    /// This signals a data-integrity breach that the repair routine fixes.
    RecipeDuplicate {
        /// The product display name.
        product: String,
        /// The duplicated material reference, rendered as `kind:id`.
        material: String,
    },
    /// A payment-method or tax-document label is outside its closed
    /// enumeration.
    LabelInvalid {
        /// The field the label was supplied for.
        field: &'static str,
        /// The rejected value.
        value: String,
    },
    /// An attempted status transition is not in the legal transition set.
    IllegalTransition {
        /// The state machine ("fulfillment", "payment", "tax_document").
        machine: &'static str,
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
    },
    /// A referenced entity does not exist.
    NotFound {
        /// The entity kind.
        entity: &'static str,
        /// The identifier that failed to resolve.
        id: String,
    },
    /// A required attribute is missing or out of range.
    Validation {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl DomainError {
    /// Returns the taxon label for this error.
    ///
    /// Taxon labels are the stable error vocabulary shared with the API
    /// boundary and the audit log.
    #[must_use]
    pub const fn taxon(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::ReservationUnderflow { .. } => "RESERVATION_UNDERFLOW",
            Self::RecipeEmpty { .. } => "RECIPE_EMPTY",
            Self::RecipeDuplicate { .. } => "RECIPE_DUPLICATE",
            Self::LabelInvalid { .. } => "LABEL_INVALID",
            Self::IllegalTransition { .. } => "STATE_ILLEGAL",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation { .. } => "VALIDATION",
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientStock {
                material,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Insufficient stock of '{material}': requested {requested}, available {available}"
                )
            }
            Self::ReservationUnderflow {
                material,
                requested,
                reserved,
            } => {
                write!(
                    f,
                    "Reservation underflow on '{material}': asked to release {requested}, only {reserved} reserved"
                )
            }
            Self::RecipeEmpty { product } => {
                write!(f, "Product '{product}' has no recipe entries")
            }
            Self::RecipeDuplicate { product, material } => {
                write!(
                    f,
                    "Product '{product}' has duplicate recipe entries for material {material}"
                )
            }
            Self::LabelInvalid { field, value } => {
                write!(f, "Invalid {field} label: '{value}'")
            }
            Self::IllegalTransition { machine, from, to } => {
                write!(f, "Illegal {machine} transition: {from} -> {to}")
            }
            Self::NotFound { entity, id } => write!(f, "{entity} '{id}' not found"),
            Self::Validation { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
