use crate::domain::model::{AdminId, CustomerId, LoginResponse};
use crate::utils::error::{RentalError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

/// The active view, each variant carrying exactly what that view needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum SessionState {
    #[default]
    Welcome,
    AdminLogin,
    CustomerLogin,
    CustomerRegister,
    AdminDashboard {
        admin_id: AdminId,
        admin_name: String,
    },
    CustomerDashboard {
        customer_id: CustomerId,
        customer_name: String,
    },
}

impl SessionState {
    pub fn login_view(role: Role) -> Self {
        match role {
            Role::Admin => SessionState::AdminLogin,
            Role::Customer => SessionState::CustomerLogin,
        }
    }

    /// Moves to the role's dashboard if the backend handed back an id for it.
    pub fn after_login(role: Role, response: &LoginResponse, email: &str) -> Result<Self> {
        let name = display_name(email);
        let next = match role {
            Role::Admin => response.admin_id.map(|admin_id| SessionState::AdminDashboard {
                admin_id,
                admin_name: name,
            }),
            Role::Customer => response
                .customer_id
                .map(|customer_id| SessionState::CustomerDashboard {
                    customer_id,
                    customer_name: name,
                }),
        };

        next.ok_or_else(|| RentalError::Rejected {
            reason: response
                .error
                .clone()
                .unwrap_or_else(|| "Login failed".to_string()),
        })
    }

    pub fn logout(self) -> Self {
        SessionState::Welcome
    }

    pub fn user_role(&self) -> Option<Role> {
        match self {
            SessionState::AdminDashboard { .. } => Some(Role::Admin),
            SessionState::CustomerDashboard { .. } => Some(Role::Customer),
            _ => None,
        }
    }

    pub fn user_name(&self) -> &str {
        match self {
            SessionState::AdminDashboard { admin_name, .. } => admin_name.as_str(),
            SessionState::CustomerDashboard { customer_name, .. } => customer_name.as_str(),
            _ => "",
        }
    }
}

fn display_name(email: &str) -> String {
    email.split('@').next().unwrap_or_default().to_string()
}
