//! Session state: the stores, the registry, and frame routing.
//!
//! One session owns the primary store (always `ViewScope::Own`), the access
//! registry, and at most one delegated secondary store with its own scope
//! and lifecycle. All reconciliation funnels through [`Session::handle_frame`]
//! sequentially, so no locking discipline is needed; correctness rests on
//! the reconciler's idempotency rules.

use tracing::{info, warn};

use crate::access::{AccessEffect, AccessGrant, AccessRegistry, GrantId};
use crate::error::{TrackerError, TrackerResult};
use crate::event::{self, TrackerEvent, WireFrame};
use crate::interview::{Interview, UserId};
use crate::reconcile::{self, Outcome};
use crate::scope::ViewScope;
use crate::store::InterviewStore;

/// A secondary store showing another user's schedule through a grant.
#[derive(Debug)]
pub struct DelegatedView {
    scope: ViewScope,
    target: UserId,
    store: InterviewStore,
}

impl DelegatedView {
    pub fn target(&self) -> UserId {
        self.target
    }

    pub fn store(&self) -> &InterviewStore {
        &self.store
    }
}

/// What routing one frame did, for callers that render or log changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEffect {
    /// Applied to the primary store.
    Schedule(Outcome),
    /// Applied to the open delegated view.
    Delegated(Outcome),
    /// Registry changed; `view_closed` is set when the change tore down the
    /// open delegated view.
    Access { view_closed: bool },
    /// Dropped during normalization.
    Dropped,
}

pub struct Session {
    self_user_id: UserId,
    store: InterviewStore,
    registry: AccessRegistry,
    delegated: Option<DelegatedView>,
}

impl Session {
    pub fn new(self_user_id: UserId) -> Self {
        Session {
            self_user_id,
            store: InterviewStore::new(),
            registry: AccessRegistry::new(self_user_id),
            delegated: None,
        }
    }

    pub fn self_user_id(&self) -> UserId {
        self.self_user_id
    }

    pub fn store(&self) -> &InterviewStore {
        &self.store
    }

    pub fn registry(&self) -> &AccessRegistry {
        &self.registry
    }

    pub fn delegated(&self) -> Option<&DelegatedView> {
        self.delegated.as_ref()
    }

    /// Seed the primary store from a snapshot pull. Replaces everything;
    /// buffered state computed before the snapshot is discarded.
    pub fn seed(&mut self, interviews: Vec<Interview>) {
        self.store.replace_all(interviews);
    }

    /// Seed the registry from `GET /interview-tracker/access`.
    pub fn seed_access(
        &mut self,
        granted_by_me: Vec<AccessGrant>,
        granted_to_me: Vec<AccessGrant>,
    ) {
        self.registry.replace_all(granted_by_me, granted_to_me);
    }

    /// Open a delegated view of `target`'s schedule with its snapshot.
    ///
    /// Fails with `NoAccess` unless a grant from `target` to the current
    /// user exists. An already-open view is replaced.
    pub fn open_delegated(
        &mut self,
        target: UserId,
        interviews: Vec<Interview>,
    ) -> TrackerResult<()> {
        if !self.registry.can_view(target) {
            return Err(TrackerError::NoAccess(target));
        }

        let mut store = InterviewStore::new();
        store.replace_all(interviews);
        self.delegated = Some(DelegatedView {
            scope: ViewScope::Delegated(target),
            target,
            store,
        });
        Ok(())
    }

    /// Tear down the delegated view. Subsequent frames for that owner die at
    /// the scope filter instead of being buffered anywhere.
    pub fn close_delegated(&mut self) {
        if let Some(view) = self.delegated.take() {
            info!(user = view.target, "delegated view closed");
        }
    }

    /// Validate a grant command before sending it to the service.
    pub fn validate_grant(&self, grantee_id: UserId) -> TrackerResult<()> {
        self.registry.validate_grant(grantee_id)
    }

    /// Validate a revoke command; returns the grant that would be revoked.
    pub fn validate_revoke(&self, grant_id: GrantId) -> TrackerResult<&AccessGrant> {
        self.registry.validate_revoke(grant_id)
    }

    /// Route one wire frame through normalization, the scope filters, and
    /// the reconciler. Anomalies are logged and recovered; the loop never
    /// stops for a bad frame.
    pub fn handle_frame(&mut self, frame: WireFrame) -> FrameEffect {
        let event = match event::normalize(frame) {
            Ok(Some(event)) => event,
            Ok(None) => return FrameEffect::Dropped,
            Err(e) => {
                warn!(error = %e, "malformed frame dropped");
                return FrameEffect::Dropped;
            }
        };

        match event {
            TrackerEvent::Interview(change) => {
                // A delegated view, when open, consumes events for its own
                // target; everything else belongs to the primary store.
                if let Some(view) = self.delegated.as_mut() {
                    if view.scope.accepts(change.interview.owner_user_id, self.self_user_id)
                        && view.target != self.self_user_id
                    {
                        let outcome = reconcile::apply(
                            &change,
                            &mut view.store,
                            view.scope,
                            self.self_user_id,
                        );
                        return FrameEffect::Delegated(outcome);
                    }
                }
                let outcome = reconcile::apply(
                    &change,
                    &mut self.store,
                    ViewScope::Own,
                    self.self_user_id,
                );
                FrameEffect::Schedule(outcome)
            }
            TrackerEvent::Access(change) => {
                let effect = self.registry.apply(&change);
                let view_closed = match effect {
                    AccessEffect::LostAccessTo(grantor) => {
                        // An open view over a revoked grant is a
                        // confidentiality violation; tear it down in the
                        // same operation.
                        let open_on_grantor =
                            self.delegated.as_ref().is_some_and(|v| v.target == grantor);
                        if open_on_grantor {
                            self.close_delegated();
                        }
                        open_on_grantor
                    }
                    _ => false,
                };
                FrameEffect::Access { view_closed }
            }
        }
    }
}
