//! Access grants and the delegation registry.
//!
//! A grant is a directed edge `grantor -> grantee` giving the grantee
//! read-only visibility into the grantor's schedule. The registry holds no
//! state that can't be re-derived from a fresh pull of
//! `GET /interview-tracker/access`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TrackerError, TrackerResult};
use crate::event::{AccessChange, ChangeKind};
use crate::interview::UserId;

pub type GrantId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessGrant {
    pub id: GrantId,
    pub grantor_id: UserId,
    pub grantee_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Local view of the current user's delegation edges, both directions.
#[derive(Debug, Default)]
pub struct AccessRegistry {
    self_user_id: UserId,
    granted_by_me: Vec<AccessGrant>,
    granted_to_me: Vec<AccessGrant>,
}

/// What a pushed or locally-applied access change did to the registry, so
/// the session can react (e.g. tear down a delegated view on revocation).
#[derive(Debug, Clone, PartialEq)]
pub enum AccessEffect {
    Granted(AccessGrant),
    /// A grant naming the current user as grantee disappeared; the named
    /// user's calendar is no longer visible.
    LostAccessTo(UserId),
    /// A grant issued by the current user disappeared.
    RevokedByMe(AccessGrant),
    Noop,
}

impl AccessRegistry {
    pub fn new(self_user_id: UserId) -> Self {
        AccessRegistry {
            self_user_id,
            granted_by_me: Vec::new(),
            granted_to_me: Vec::new(),
        }
    }

    /// Replace both listings from a fresh pull.
    pub fn replace_all(&mut self, granted_by_me: Vec<AccessGrant>, granted_to_me: Vec<AccessGrant>) {
        self.granted_by_me = granted_by_me;
        self.granted_to_me = granted_to_me;
    }

    pub fn granted_by_me(&self) -> &[AccessGrant] {
        &self.granted_by_me
    }

    pub fn granted_to_me(&self) -> &[AccessGrant] {
        &self.granted_to_me
    }

    /// Whether the current user may open a delegated view of `target`.
    pub fn can_view(&self, target: UserId) -> bool {
        self.granted_to_me.iter().any(|g| g.grantor_id == target)
    }

    /// Validate a grant command before it goes to the server.
    pub fn validate_grant(&self, grantee_id: UserId) -> TrackerResult<()> {
        if grantee_id <= 0 {
            return Err(TrackerError::InvalidTarget(format!(
                "user id {grantee_id} is not valid"
            )));
        }
        if grantee_id == self.self_user_id {
            return Err(TrackerError::InvalidTarget(
                "cannot grant calendar access to yourself".to_string(),
            ));
        }
        if self
            .granted_by_me
            .iter()
            .any(|g| g.grantee_id == grantee_id)
        {
            return Err(TrackerError::DuplicateGrant(grantee_id));
        }
        Ok(())
    }

    /// Validate a revoke command: only grants issued by the current user are
    /// revocable.
    pub fn validate_revoke(&self, grant_id: GrantId) -> TrackerResult<&AccessGrant> {
        self.granted_by_me
            .iter()
            .find(|g| g.id == grant_id)
            .ok_or(TrackerError::NotGrantor(grant_id))
    }

    /// Apply a delegation change delivered over the push channel (or echoed
    /// back after a local command).
    pub fn apply(&mut self, change: &AccessChange) -> AccessEffect {
        let grant = &change.grant;
        match change.kind {
            ChangeKind::Created | ChangeKind::Updated => {
                if grant.grantee_id == self.self_user_id {
                    upsert(&mut self.granted_to_me, grant);
                    AccessEffect::Granted(grant.clone())
                } else if grant.grantor_id == self.self_user_id {
                    upsert(&mut self.granted_by_me, grant);
                    AccessEffect::Granted(grant.clone())
                } else {
                    debug!(grant = grant.id, "access change does not involve this user");
                    AccessEffect::Noop
                }
            }
            ChangeKind::Deleted => {
                if let Some(idx) = self.granted_to_me.iter().position(|g| g.id == grant.id) {
                    let removed = self.granted_to_me.remove(idx);
                    return AccessEffect::LostAccessTo(removed.grantor_id);
                }
                if let Some(idx) = self.granted_by_me.iter().position(|g| g.id == grant.id) {
                    let removed = self.granted_by_me.remove(idx);
                    return AccessEffect::RevokedByMe(removed);
                }
                AccessEffect::Noop
            }
            ChangeKind::StatusUpdated | ChangeKind::ResultUpdated => {
                // These kinds are interview-only; an access frame carrying
                // them is malformed traffic.
                debug!(kind = change.kind.as_str(), "ignoring access change kind");
                AccessEffect::Noop
            }
        }
    }
}

fn upsert(grants: &mut Vec<AccessGrant>, grant: &AccessGrant) {
    match grants.iter_mut().find(|g| g.id == grant.id) {
        Some(existing) => *existing = grant.clone(),
        None => grants.push(grant.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_grant(id: i64, grantor: i64, grantee: i64) -> AccessGrant {
        AccessGrant {
            id,
            grantor_id: grantor,
            grantee_id: grantee,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_grant_to_self_is_invalid() {
        let registry = AccessRegistry::new(7);
        assert!(matches!(
            registry.validate_grant(7),
            Err(TrackerError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_duplicate_grant_is_rejected() {
        let mut registry = AccessRegistry::new(7);
        registry.replace_all(vec![make_grant(1, 7, 9)], vec![]);

        assert!(matches!(
            registry.validate_grant(9),
            Err(TrackerError::DuplicateGrant(9))
        ));
        assert!(registry.validate_grant(10).is_ok());
    }

    #[test]
    fn test_revoke_requires_grantor() {
        let mut registry = AccessRegistry::new(9);
        // Grant 5 was issued *to* user 9, not by them.
        registry.replace_all(vec![], vec![make_grant(5, 7, 9)]);

        assert!(matches!(
            registry.validate_revoke(5),
            Err(TrackerError::NotGrantor(5))
        ));
    }

    #[test]
    fn test_deleted_grant_reports_lost_access() {
        let mut registry = AccessRegistry::new(9);
        registry.replace_all(vec![], vec![make_grant(5, 7, 9)]);

        let effect = registry.apply(&AccessChange {
            kind: ChangeKind::Deleted,
            grant: make_grant(5, 7, 9),
        });

        assert_eq!(effect, AccessEffect::LostAccessTo(7));
        assert!(!registry.can_view(7));
    }

    #[test]
    fn test_created_grant_is_upserted_once() {
        let mut registry = AccessRegistry::new(9);
        let change = AccessChange {
            kind: ChangeKind::Created,
            grant: make_grant(5, 7, 9),
        };

        registry.apply(&change);
        registry.apply(&change);

        assert_eq!(registry.granted_to_me().len(), 1);
        assert!(registry.can_view(7));
    }

    #[test]
    fn test_unrelated_grant_is_ignored() {
        let mut registry = AccessRegistry::new(9);
        let effect = registry.apply(&AccessChange {
            kind: ChangeKind::Created,
            grant: make_grant(5, 3, 4),
        });

        assert_eq!(effect, AccessEffect::Noop);
        assert!(registry.granted_to_me().is_empty());
        assert!(registry.granted_by_me().is_empty());
    }
}
