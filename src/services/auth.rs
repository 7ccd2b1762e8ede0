// src/services/auth.rs

use std::{collections::HashMap, path::Path, sync::Arc};

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    models::auth::{Claims, Credential, CurrentUser},
};

/// Where credentials come from. The production store is a static file loaded
/// once at startup; tests plug in fakes.
pub trait CredentialProvider: Send + Sync {
    fn lookup(&self, username: &str) -> Option<&Credential>;
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    users: HashMap<String, Credential>,
}

/// Immutable username -> credential mapping, provisioned out-of-band in a
/// JSON file. There is no registration endpoint: accounts are fixed
/// configuration, one clinic per non-admin user.
pub struct StaticCredentialStore {
    users: HashMap<String, Credential>,
}

impl StaticCredentialStore {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read credentials file {}: {}", path.display(), e))?;
        let file: CredentialsFile = serde_json::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("malformed credentials file {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} provisioned users", file.users.len());
        Ok(Self { users: file.users })
    }
}

impl CredentialProvider for StaticCredentialStore {
    fn lookup(&self, username: &str) -> Option<&Credential> {
        self.users.get(username)
    }
}

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialProvider>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialProvider>, jwt_secret: String) -> Self {
        Self {
            credentials,
            jwt_secret,
        }
    }

    /// Checks a username/password pair and mints a bearer token. Unknown
    /// users and wrong passwords are indistinguishable to the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let credential = self
            .credentials
            .lookup(username)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?;

        // bcrypt verification is CPU-bound; keep it off the async workers.
        let password = password.to_owned();
        let password_hash = credential.password_hash.clone();
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password, &password_hash)
        })
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(username, &credential)
    }

    /// Resolves a bearer token back to the caller. Role and clinic come from
    /// the credential store, not the token, so de-provisioned users are
    /// locked out as soon as the store changes.
    pub fn validate_token(&self, token: &str) -> Result<CurrentUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let username = token_data.claims.sub;
        let credential = self
            .credentials
            .lookup(&username)
            .ok_or(AppError::InvalidToken)?;

        Ok(CurrentUser {
            username,
            role: credential.role,
            clinic: credential.clinic.clone(),
        })
    }

    fn create_token(&self, username: &str, credential: &Credential) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: username.to_string(),
            role: credential.role,
            clinic: credential.clinic.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    struct FakeProvider {
        users: HashMap<String, Credential>,
    }

    impl CredentialProvider for FakeProvider {
        fn lookup(&self, username: &str) -> Option<&Credential> {
            self.users.get(username)
        }
    }

    fn service() -> AuthService {
        let mut users = HashMap::new();
        users.insert(
            "clinic2".to_string(),
            Credential {
                password_hash: bcrypt::hash("clinic2pass", 4).unwrap(),
                role: Role::User,
                clinic: "Clinic 2 - Mombasa".to_string(),
            },
        );
        AuthService::new(
            Arc::new(FakeProvider { users }),
            "test-secret".to_string(),
        )
    }

    #[tokio::test]
    async fn login_round_trip_resolves_role_and_clinic() {
        let auth = service();
        let token = auth.login("clinic2", "clinic2pass").await.unwrap();
        let user = auth.validate_token(&token).unwrap();
        assert_eq!(user.username, "clinic2");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.clinic, "Clinic 2 - Mombasa");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let auth = service();
        let wrong_password = auth.login("clinic2", "nope").await;
        let unknown_user = auth.login("ghost", "nope").await;
        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let auth = service();
        assert!(matches!(
            auth.validate_token("not-a-token"),
            Err(AppError::InvalidToken)
        ));
    }
}
