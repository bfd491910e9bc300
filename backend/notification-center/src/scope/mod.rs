//! Scope policy: maps a caller session to a query predicate.
//!
//! Pure function, no I/O. All authorization decisions in the service reduce
//! to a `ScopeFilter` computed here, so the rules live in one place instead
//! of being scattered across handlers.

use crate::models::{CallerSession, Notification, Role, TargetScope};
use uuid::Uuid;

/// Predicate over stored notifications for one caller session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    /// Every notification, broadcast or member-addressed (admins)
    All,
    /// Only notifications addressed to this member. Broadcasts are
    /// admin-only alerts and are excluded.
    MemberOnly(Uuid),
    /// Matches nothing (unauthenticated or role-less callers)
    Nothing,
}

impl ScopeFilter {
    pub fn matches(&self, notification: &Notification) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::MemberOnly(member_id) => {
                notification.target == TargetScope::Member(*member_id)
            }
            ScopeFilter::Nothing => false,
        }
    }
}

/// Compute the scope filter for a session. Same session always yields the
/// same filter.
pub fn scope_filter(session: &CallerSession) -> ScopeFilter {
    match (session.role, session.caller_id) {
        (Role::Admin, Some(_)) => ScopeFilter::All,
        (Role::Member, Some(caller_id)) => ScopeFilter::MemberOnly(caller_id),
        // A session carrying a role but no identifier is malformed; refuse it
        _ => ScopeFilter::Nothing,
    }
}
