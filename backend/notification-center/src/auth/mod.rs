//! Identity resolution: opaque bearer token -> caller session.
//!
//! Token validation failures are not errors. An unresolvable token degrades
//! to the anonymous session so downstream logic treats unauthenticated
//! callers uniformly instead of branching on auth faults.

use crate::error::Result;
use crate::models::{CallerSession, Role};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// JWT claims carried by the access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (caller ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(caller_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            sub: caller_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }
}

/// External account store consulted for the caller's role
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Role recorded for the account, or `None` when the account is unknown
    /// or carries no role field
    async fn lookup_role(&self, caller_id: Uuid) -> Result<Option<Role>>;
}

/// Account store backed by the `accounts` table
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn lookup_role(&self, caller_id: Uuid) -> Result<Option<Role>> {
        let row = sqlx::query("SELECT role FROM accounts WHERE id = $1")
            .bind(caller_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row
            .and_then(|r| r.get::<Option<String>, _>("role"))
            .map(|role| Role::parse(&role)))
    }
}

/// Fixed account map, for tests and database-less runs
#[derive(Default)]
pub struct StaticAccountStore {
    roles: HashMap<Uuid, Role>,
}

impl StaticAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_role(mut self, caller_id: Uuid, role: Role) -> Self {
        self.roles.insert(caller_id, role);
        self
    }
}

#[async_trait]
impl AccountStore for StaticAccountStore {
    async fn lookup_role(&self, caller_id: Uuid) -> Result<Option<Role>> {
        Ok(self.roles.get(&caller_id).copied())
    }
}

/// Resolves opaque tokens into caller sessions.
///
/// No side effects and no caching; a session is recomputed from the token
/// and the account store on every invocation.
pub struct IdentityResolver {
    decoding_key: DecodingKey,
    validation: Validation,
    accounts: Arc<dyn AccountStore>,
}

impl IdentityResolver {
    pub fn new(jwt_secret: &str, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            accounts,
        }
    }

    /// Resolve a bearer token to a session. Never fails: expired, malformed
    /// or unknown tokens all degrade to the anonymous session.
    pub async fn resolve(&self, token: Option<&str>) -> CallerSession {
        let Some(token) = token else {
            return CallerSession::anonymous();
        };

        let claims = match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Token rejected: {}", e);
                return CallerSession::anonymous();
            }
        };

        let Ok(caller_id) = Uuid::parse_str(&claims.sub) else {
            debug!("Token subject is not a valid id");
            return CallerSession::anonymous();
        };

        match self.accounts.lookup_role(caller_id).await {
            Ok(Some(Role::Admin)) => CallerSession::admin(caller_id),
            Ok(Some(Role::Member)) => CallerSession::member(caller_id),
            // Unknown account or no role field recorded
            Ok(Some(Role::None)) | Ok(None) => CallerSession::anonymous(),
            Err(e) => {
                warn!(caller_id = %caller_id, "Role lookup failed, treating caller as anonymous: {}", e);
                CallerSession::anonymous()
            }
        }
    }
}
