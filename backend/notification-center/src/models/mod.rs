use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Caller role as recorded in the account store
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Building staff; sees every notification
    Admin,
    /// Tenant; sees only notifications addressed to them
    Member,
    /// Unauthenticated or role-less caller
    None,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Member => "member",
            Role::None => "none",
        }
    }

    /// Parse a role from its stored string form. Unknown values degrade to
    /// `Role::None` so a malformed account record never escalates access.
    pub fn parse(s: &str) -> Role {
        match s.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "member" => Role::Member,
            _ => Role::None,
        }
    }
}

/// Per-request caller identity, derived from an opaque token.
///
/// Recomputed on every operation; never cached across requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallerSession {
    /// Stable caller identifier; absent for unauthenticated callers
    pub caller_id: Option<Uuid>,
    pub role: Role,
}

impl CallerSession {
    pub fn admin(caller_id: Uuid) -> Self {
        Self {
            caller_id: Some(caller_id),
            role: Role::Admin,
        }
    }

    pub fn member(caller_id: Uuid) -> Self {
        Self {
            caller_id: Some(caller_id),
            role: Role::Member,
        }
    }

    /// The degraded session for unresolvable tokens
    pub fn anonymous() -> Self {
        Self {
            caller_id: None,
            role: Role::None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role != Role::None
    }
}

/// Who a notification is addressed to. Fixed at creation time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetScope {
    /// Staff-wide alert (e.g. a new maintenance request); admin-only
    Broadcast,
    /// Addressed to a single member
    Member(Uuid),
}

impl TargetScope {
    pub fn member_id(&self) -> Option<Uuid> {
        match self {
            TargetScope::Broadcast => None,
            TargetScope::Member(id) => Some(*id),
        }
    }
}

/// One unit of information surfaced to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,

    /// Human-readable text, immutable after creation
    pub message: String,

    /// Addressing scope, immutable after creation
    pub target: TargetScope,

    /// Optional avatar/image reference, carried opaque
    pub image_url: Option<String>,

    /// Read status; the only mutable field, and only forward (false -> true)
    pub is_read: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Request to ingest a notification from an upstream workflow
/// (parcel arrivals, maintenance reports). Not exposed on the
/// caller-facing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNotification {
    pub message: String,
    pub target: TargetScope,
    pub image_url: Option<String>,
}
