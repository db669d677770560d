// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the api layer.
//!
//! Domain, core, and persistence errors are translated here so they never
//! leak their internal shape to the wire. Each api error carries the taxon
//! label the server maps to an HTTP status.

use violeta::CoreError;
use violeta_domain::DomainError;
use violeta_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Api-level errors.
///
/// These are distinct from domain/core errors and represent the api
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed, the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform this action.
        required_role: String,
    },
    /// A business rule was violated.
    DomainRuleViolation {
        /// The taxon label of the violated rule.
        taxon: &'static str,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The taxon label of the rejection.
        taxon: &'static str,
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the taxon label carried to the wire.
    #[must_use]
    pub const fn taxon(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "AUTH_FAILED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::DomainRuleViolation { taxon, .. } | Self::InvalidInput { taxon, .. } => taxon,
            Self::ResourceNotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { taxon, message } => {
                write!(f, "{taxon}: {message}")
            }
            Self::InvalidInput { field, message, .. } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound { message } => {
                write!(f, "Not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an api error.
///
/// The translation is explicit so domain errors are never leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let taxon: &'static str = err.taxon();
    match &err {
        DomainError::Validation { field, .. } | DomainError::LabelInvalid { field, .. } => {
            ApiError::InvalidInput {
                taxon,
                field: (*field).to_string(),
                message: err.to_string(),
            }
        }
        DomainError::NotFound { .. } => ApiError::ResourceNotFound {
            message: err.to_string(),
        },
        _ => ApiError::DomainRuleViolation {
            taxon,
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an api error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an api error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound { message },
        PersistenceError::InvalidCredentials => ApiError::AuthenticationFailed {
            reason: String::from("invalid credentials"),
        },
        PersistenceError::StillReferenced { entity, id } => ApiError::DomainRuleViolation {
            taxon: "STILL_REFERENCED",
            message: format!("{entity} {id} is still referenced by existing orders"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
