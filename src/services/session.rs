//! Session role resolution.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::Role;
use crate::store::Store;

/// The identity a signed-in email resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The email, trimmed.
    pub email: String,
    /// The resolved role.
    pub role: Role,
    /// The employee profile, when one exists.
    pub employee_id: Option<String>,
}

/// Resolves the role of a signed-in email.
///
/// Emails in the company admin allow-list are admins whether or not they
/// have a profile. Other emails take the role of their employee profile.
///
/// # Errors
///
/// [`EngineError::EmployeeNotFound`] when the email is neither an admin nor
/// a registered employee.
pub async fn resolve_session(store: &Store, email: &str) -> EngineResult<Session> {
    let email = email.trim();
    if email.is_empty() {
        return Err(EngineError::validation("email", "must not be empty"));
    }
    let data = store.read().await;
    let profile = data.employee_by_email(email);

    let session = if data.config.company().is_admin_email(email) {
        Session {
            email: email.to_string(),
            role: Role::Admin,
            employee_id: profile.map(|e| e.id.clone()),
        }
    } else if let Some(employee) = profile {
        Session {
            email: email.to_string(),
            role: employee.role,
            employee_id: Some(employee.id.clone()),
        }
    } else {
        warn!(email = %email, "Session rejected: email not registered");
        return Err(EngineError::EmployeeNotFound {
            id: email.to_string(),
        });
    };

    info!(email = %email, role = ?session.role, "Session resolved");
    Ok(session)
}
