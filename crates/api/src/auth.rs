// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use violeta_audit::Actor;
use violeta_persistence::UserData;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles determine what operations an authenticated actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full authority over every operation, including user
    /// management, the audit log, and repair routines.
    Admin,
    /// Secretary role: order intake, billing, catalog and customer
    /// management, and the scheduled sweep.
    Secretary,
    /// Workshop role: dispatch and stock operations.
    Workshop,
}

impl Role {
    /// Parses the stored role label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "admin" => Some(Self::Admin),
            "secretary" => Some(Self::Secretary),
            "workshop" => Some(Self::Workshop),
            _ => None,
        }
    }

    /// Returns the stored role label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Secretary => "secretary",
            Self::Workshop => "workshop",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user id of this actor.
    pub user_id: i64,
    /// The display name shown in the audit log.
    pub display_name: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Builds an authenticated actor from a verified user.
    ///
    /// # Errors
    ///
    /// Returns an error for a deactivated user or an unknown stored role.
    pub fn from_user(user: &UserData) -> Result<Self, AuthError> {
        if !user.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: format!("user '{}' is deactivated", user.login),
            });
        }
        let role: Role = Role::parse(&user.role).ok_or_else(|| AuthError::AuthenticationFailed {
            reason: format!("user '{}' has unknown role '{}'", user.login, user.role),
        })?;
        Ok(Self {
            user_id: user.user_id,
            display_name: user.display_name.clone(),
            role,
        })
    }

    /// Converts this actor into an audit actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::user(self.user_id, self.display_name.clone())
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may create, edit, cancel, or bill orders.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin or secretary.
    pub fn authorize_manage_orders(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Secretary => Ok(()),
            Role::Workshop => Err(AuthError::Unauthorized {
                action: String::from("manage_orders"),
                required_role: String::from("Admin or Secretary"),
            }),
        }
    }

    /// Checks if an actor may dispatch orders.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin or workshop user.
    pub fn authorize_dispatch(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Workshop => Ok(()),
            Role::Secretary => Err(AuthError::Unauthorized {
                action: String::from("dispatch"),
                required_role: String::from("Admin or Workshop"),
            }),
        }
    }

    /// Checks if an actor may manage the catalog and customers.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin or secretary.
    pub fn authorize_manage_catalog(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Secretary => Ok(()),
            Role::Workshop => Err(AuthError::Unauthorized {
                action: String::from("manage_catalog"),
                required_role: String::from("Admin or Secretary"),
            }),
        }
    }

    /// Checks if an actor may restock materials or import stock.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin or workshop user.
    pub fn authorize_stock(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Workshop => Ok(()),
            Role::Secretary => Err(AuthError::Unauthorized {
                action: String::from("stock"),
                required_role: String::from("Admin or Workshop"),
            }),
        }
    }

    /// Checks if an actor may run the scheduled sweep.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin or secretary.
    pub fn authorize_sweep(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin | Role::Secretary => Ok(()),
            Role::Workshop => Err(AuthError::Unauthorized {
                action: String::from("sweep"),
                required_role: String::from("Admin or Secretary"),
            }),
        }
    }

    /// Checks if an actor may manage users.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin.
    pub fn authorize_manage_users(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Secretary | Role::Workshop => Err(AuthError::Unauthorized {
                action: String::from("manage_users"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may query the audit log.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin.
    pub fn authorize_view_audit(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Secretary | Role::Workshop => Err(AuthError::Unauthorized {
                action: String::from("view_audit"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may run integrity repair.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an admin.
    pub fn authorize_repair(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Secretary | Role::Workshop => Err(AuthError::Unauthorized {
                action: String::from("repair"),
                required_role: String::from("Admin"),
            }),
        }
    }
}
