// src/models/auth.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::error::AppError;

/// Sentinel clinic scope granted to admins: every clinic at once.
pub const ALL_CLINICS: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// One entry of the static credential file: bcrypt hash plus the role and
/// clinic assigned at provisioning time. Not user-editable at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub password_hash: String,
    pub role: Role,
    pub clinic: String,
}

/// The authenticated caller, as resolved by the auth middleware.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
    pub clinic: String,
}

impl CurrentUser {
    /// Which clinic's stock this user may look at for a given request.
    /// Admins default to "All" and may narrow to any single clinic; everyone
    /// else is pinned to their provisioned clinic.
    pub fn resolve_view_scope(&self, requested: Option<&str>) -> Result<String, AppError> {
        match self.role {
            Role::Admin => Ok(requested.unwrap_or(ALL_CLINICS).to_string()),
            Role::User => match requested {
                None => Ok(self.clinic.clone()),
                Some(clinic) if clinic == self.clinic => Ok(self.clinic.clone()),
                Some(_) => Err(AppError::ClinicScopeDenied),
            },
        }
    }

    /// Which clinic a receive action writes into. Stock always lands in a
    /// concrete clinic, so admins must name one ("All" is not a clinic).
    pub fn resolve_receive_clinic(&self, requested: Option<&str>) -> Result<String, AppError> {
        match self.role {
            Role::Admin => match requested {
                Some(clinic) if clinic != ALL_CLINICS => Ok(clinic.to_string()),
                _ => Err(AppError::ClinicRequired),
            },
            Role::User => match requested {
                None => Ok(self.clinic.clone()),
                Some(clinic) if clinic == self.clinic => Ok(self.clinic.clone()),
                Some(_) => Err(AppError::ClinicScopeDenied),
            },
        }
    }

    pub fn may_access_clinic(&self, clinic: &str) -> bool {
        self.role == Role::Admin || self.clinic == clinic
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}

/// Claims carried inside the bearer token. Role and clinic are re-resolved
/// against the credential store on every request, so a stale token cannot
/// outlive a provisioning change.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub clinic: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> CurrentUser {
        CurrentUser {
            username: "admin".into(),
            role: Role::Admin,
            clinic: ALL_CLINICS.into(),
        }
    }

    fn mombasa_user() -> CurrentUser {
        CurrentUser {
            username: "clinic2".into(),
            role: Role::User,
            clinic: "Clinic 2 - Mombasa".into(),
        }
    }

    #[test]
    fn admin_view_defaults_to_all_clinics() {
        assert_eq!(admin().resolve_view_scope(None).unwrap(), ALL_CLINICS);
        assert_eq!(
            admin().resolve_view_scope(Some("Clinic 1 - Nairobi")).unwrap(),
            "Clinic 1 - Nairobi"
        );
    }

    #[test]
    fn user_view_is_pinned_to_own_clinic() {
        let user = mombasa_user();
        assert_eq!(user.resolve_view_scope(None).unwrap(), "Clinic 2 - Mombasa");
        assert_eq!(
            user.resolve_view_scope(Some("Clinic 2 - Mombasa")).unwrap(),
            "Clinic 2 - Mombasa"
        );
        assert!(matches!(
            user.resolve_view_scope(Some("Clinic 1 - Nairobi")),
            Err(AppError::ClinicScopeDenied)
        ));
    }

    #[test]
    fn admin_receive_requires_a_concrete_clinic() {
        assert!(matches!(
            admin().resolve_receive_clinic(None),
            Err(AppError::ClinicRequired)
        ));
        assert!(matches!(
            admin().resolve_receive_clinic(Some(ALL_CLINICS)),
            Err(AppError::ClinicRequired)
        ));
        assert_eq!(
            admin().resolve_receive_clinic(Some("Clinic 3 - Kisumu")).unwrap(),
            "Clinic 3 - Kisumu"
        );
    }

    #[test]
    fn user_cannot_receive_into_another_clinic() {
        assert!(matches!(
            mombasa_user().resolve_receive_clinic(Some("Clinic 3 - Kisumu")),
            Err(AppError::ClinicScopeDenied)
        ));
    }
}
