//! Change-event reconciliation.
//!
//! Merges normalized change events into an interview store. The scope filter
//! runs before any mutation: it is the confidentiality boundary that keeps a
//! shared event stream from leaking one user's records into another user's
//! delegated view. Everything past the filter is idempotent, so duplicate or
//! out-of-causal-order delivery converges to the same store contents.

use tracing::{debug, trace};

use crate::event::{ChangeEvent, ChangeKind};
use crate::interview::UserId;
use crate::scope::ViewScope;
use crate::store::InterviewStore;

/// What applying an event did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

/// Why an event was dropped. These are steady-state traffic on a shared
/// stream, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Owner does not match the store's view scope.
    OutOfScope,
    /// A record with the incoming id already exists.
    DuplicateId,
    /// A record already links to the incoming id: the local counterpart of
    /// the same meeting was materialized first.
    DuplicateLinked,
}

/// Apply one change event to a store under the given scope.
///
/// Events are expected in arrival order per store; updated-class events
/// carry the full resulting record, so last-write-wins is correct without
/// any buffering.
pub fn apply(
    event: &ChangeEvent,
    store: &mut InterviewStore,
    scope: ViewScope,
    self_user_id: UserId,
) -> Outcome {
    let interview = &event.interview;

    if !scope.accepts(interview.owner_user_id, self_user_id) {
        trace!(
            id = interview.id,
            owner = interview.owner_user_id,
            "event out of scope, dropped"
        );
        return Outcome::Ignored(IgnoreReason::OutOfScope);
    }

    match event.kind {
        ChangeKind::Created => {
            if store.contains(interview.id) {
                debug!(id = interview.id, "duplicate created event ignored");
                return Outcome::Ignored(IgnoreReason::DuplicateId);
            }
            // One logical meeting yields two owner-scoped records; if our
            // side already links to the incoming id, the counterpart was
            // materialized by the local create flow.
            if store.contains_linked(interview.id) {
                debug!(id = interview.id, "counterpart already linked, ignored");
                return Outcome::Ignored(IgnoreReason::DuplicateLinked);
            }
            store.insert(interview.clone());
            Outcome::Applied
        }
        ChangeKind::Updated | ChangeKind::StatusUpdated | ChangeKind::ResultUpdated => {
            // Wholesale replace; a missing id means we missed the creation
            // event, so the update doubles as the insert.
            store.upsert(interview.clone());
            Outcome::Applied
        }
        ChangeKind::Deleted => {
            // Removing an absent id is a no-op with the same end state.
            store.remove(interview.id);
            Outcome::Applied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::{Interview, InterviewStatus, InvitationStatus};
    use chrono::{NaiveDate, NaiveTime};

    fn make_interview(id: i64, owner: i64, date: &str, time: &str) -> Interview {
        Interview {
            id,
            owner_user_id: owner,
            date: date.parse::<NaiveDate>().unwrap(),
            time: time.parse::<NaiveTime>().unwrap(),
            counterpart_name: "Acme".to_string(),
            position: None,
            status: InterviewStatus::Scheduled,
            result: None,
            invitation_status: InvitationStatus::None,
            linked_interview_id: None,
            notes: None,
        }
    }

    fn event(kind: ChangeKind, interview: Interview) -> ChangeEvent {
        ChangeEvent { kind, interview }
    }

    #[test]
    fn test_created_then_deleted() {
        let mut store = InterviewStore::new();

        let created = event(
            ChangeKind::Created,
            make_interview(1, 7, "2024-03-05", "10:00:00"),
        );
        assert_eq!(apply(&created, &mut store, ViewScope::Own, 7), Outcome::Applied);
        assert_eq!(store.len(), 1);

        let deleted = event(
            ChangeKind::Deleted,
            make_interview(1, 7, "2024-03-05", "10:00:00"),
        );
        assert_eq!(apply(&deleted, &mut store, ViewScope::Own, 7), Outcome::Applied);
        assert!(store.is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut store = InterviewStore::new();
        let created = event(
            ChangeKind::Created,
            make_interview(1, 7, "2024-03-05", "10:00:00"),
        );

        apply(&created, &mut store, ViewScope::Own, 7);
        let first: Vec<Interview> = store.iter().cloned().collect();

        apply(&created, &mut store, ViewScope::Own, 7);
        let second: Vec<Interview> = store.iter().cloned().collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_scope_isolation_for_delegated_store() {
        let mut store = InterviewStore::new();
        store.insert(make_interview(1, 7, "2024-03-05", "10:00:00"));

        // Viewing user is 9, delegated into user 7's schedule. An event for
        // owner 3 must never touch this store.
        let foreign = event(
            ChangeKind::Updated,
            make_interview(2, 3, "2024-03-06", "11:00:00"),
        );
        let outcome = apply(&foreign, &mut store, ViewScope::Delegated(7), 9);

        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::OutOfScope));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_own_scope_drops_other_owners() {
        let mut store = InterviewStore::new();
        let foreign = event(
            ChangeKind::Created,
            make_interview(1, 8, "2024-03-05", "10:00:00"),
        );

        let outcome = apply(&foreign, &mut store, ViewScope::Own, 7);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::OutOfScope));
        assert!(store.is_empty());
    }

    #[test]
    fn test_linked_counterpart_suppresses_created() {
        let mut store = InterviewStore::new();
        let mut local = make_interview(2, 7, "2024-03-05", "10:00:00");
        local.linked_interview_id = Some(1);
        store.insert(local);

        let created = event(
            ChangeKind::Created,
            make_interview(1, 7, "2024-03-05", "10:00:00"),
        );
        let outcome = apply(&created, &mut store, ViewScope::Own, 7);

        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::DuplicateLinked));
        assert_eq!(store.len(), 1);
        assert!(store.contains(2));
    }

    #[test]
    fn test_update_for_unknown_id_self_heals_as_insert() {
        let mut store = InterviewStore::new();
        let mut updated = make_interview(4, 7, "2024-03-08", "09:00:00");
        updated.status = InterviewStatus::Completed;

        apply(
            &event(ChangeKind::StatusUpdated, updated.clone()),
            &mut store,
            ViewScope::Own,
            7,
        );

        assert_eq!(store.get(4), Some(&updated));
    }

    #[test]
    fn test_no_duplicate_ids_across_event_sequences() {
        let mut store = InterviewStore::new();
        let a = make_interview(1, 7, "2024-03-05", "10:00:00");
        let b = make_interview(1, 7, "2024-03-09", "15:00:00");

        apply(&event(ChangeKind::Created, a.clone()), &mut store, ViewScope::Own, 7);
        apply(&event(ChangeKind::Updated, b.clone()), &mut store, ViewScope::Own, 7);
        apply(&event(ChangeKind::Created, a), &mut store, ViewScope::Own, 7);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1), Some(&b));
    }

    #[test]
    fn test_sort_order_held_after_any_sequence() {
        let mut store = InterviewStore::new();
        for (id, date, time) in [
            (3, "2024-03-10", "09:00:00"),
            (1, "2024-03-05", "14:00:00"),
            (2, "2024-03-05", "10:00:00"),
        ] {
            apply(
                &event(ChangeKind::Created, make_interview(id, 7, date, time)),
                &mut store,
                ViewScope::Own,
                7,
            );
        }
        // Move #3 to the front of the month.
        apply(
            &event(
                ChangeKind::Updated,
                make_interview(3, 7, "2024-03-01", "08:00:00"),
            ),
            &mut store,
            ViewScope::Own,
            7,
        );

        let keys: Vec<_> = store.iter().map(|iv| iv.sort_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_delete_before_create_is_not_tombstoned() {
        // Out-of-order delivery: the delete lands on an empty store, then
        // the create arrives. The record stays until the next delete or
        // snapshot, matching the reconnect recovery rule.
        let mut store = InterviewStore::new();
        let iv = make_interview(1, 7, "2024-03-05", "10:00:00");

        apply(&event(ChangeKind::Deleted, iv.clone()), &mut store, ViewScope::Own, 7);
        assert!(store.is_empty());

        apply(&event(ChangeKind::Created, iv), &mut store, ViewScope::Own, 7);
        assert_eq!(store.len(), 1);
    }
}
