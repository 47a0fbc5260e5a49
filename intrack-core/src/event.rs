//! Push-channel frames and change-event normalization.
//!
//! The tracker service emits two frame topics over one authenticated stream:
//! `interview-tracker:update` for schedule changes and
//! `interview-tracker-access:update` for delegation changes. Five wire kinds
//! are normalized into a single [`ChangeEvent`] shape so the reconciler
//! only ever deals with one input type.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::access::AccessGrant;
use crate::error::{TrackerError, TrackerResult};
use crate::interview::Interview;

/// Kind of an incremental change, as a closed set.
///
/// The wire carries these as strings; anything outside the set is rejected
/// as [`TrackerError::UnknownEventKind`] before it reaches the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Created,
    Updated,
    StatusUpdated,
    ResultUpdated,
    Deleted,
}

impl ChangeKind {
    pub fn parse(raw: &str) -> Option<ChangeKind> {
        match raw {
            "created" => Some(ChangeKind::Created),
            "updated" => Some(ChangeKind::Updated),
            "status-updated" => Some(ChangeKind::StatusUpdated),
            "result-updated" => Some(ChangeKind::ResultUpdated),
            "deleted" => Some(ChangeKind::Deleted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::StatusUpdated => "status-updated",
            ChangeKind::ResultUpdated => "result-updated",
            ChangeKind::Deleted => "deleted",
        }
    }
}

/// A normalized schedule change. Transient input to the reconciler, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub interview: Interview,
}

/// A normalized delegation change.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessChange {
    pub kind: ChangeKind,
    pub grant: AccessGrant,
}

/// One frame as delivered by the push channel.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "topic", content = "payload")]
pub enum WireFrame {
    #[serde(rename = "interview-tracker:update")]
    Interview(RawUpdate),
    #[serde(rename = "interview-tracker-access:update")]
    Access(RawUpdate),
}

/// Raw payload before kind and body validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUpdate {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(alias = "interview", alias = "access")]
    pub body: serde_json::Value,
}

/// A frame after normalization, ready for routing.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    Interview(ChangeEvent),
    Access(AccessChange),
}

/// Normalize a wire frame into a typed event.
///
/// Returns `Ok(None)` for frames that are dropped by design (missing id);
/// an unknown kind string or a malformed body is an error the caller logs
/// and skips without stopping the loop.
pub fn normalize(frame: WireFrame) -> TrackerResult<Option<TrackerEvent>> {
    match frame {
        WireFrame::Interview(raw) => {
            let kind = parse_kind(&raw.kind)?;

            // A payload without an interview id cannot be reconciled against
            // anything; drop it rather than guess.
            if raw.body.get("id").and_then(|v| v.as_i64()).is_none() {
                warn!(kind = %raw.kind, "dropping interview frame without an id");
                return Ok(None);
            }

            let interview: Interview = serde_json::from_value(raw.body)
                .map_err(|e| TrackerError::Serialization(e.to_string()))?;

            Ok(Some(TrackerEvent::Interview(ChangeEvent { kind, interview })))
        }
        WireFrame::Access(raw) => {
            let kind = parse_kind(&raw.kind)?;

            if raw.body.get("id").and_then(|v| v.as_i64()).is_none() {
                warn!(kind = %raw.kind, "dropping access frame without an id");
                return Ok(None);
            }

            let grant: AccessGrant = serde_json::from_value(raw.body)
                .map_err(|e| TrackerError::Serialization(e.to_string()))?;

            Ok(Some(TrackerEvent::Access(AccessChange { kind, grant })))
        }
    }
}

fn parse_kind(raw: &str) -> TrackerResult<ChangeKind> {
    ChangeKind::parse(raw).ok_or_else(|| TrackerError::UnknownEventKind(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interview_frame(kind: &str, body: serde_json::Value) -> WireFrame {
        serde_json::from_value(json!({
            "topic": "interview-tracker:update",
            "payload": { "type": kind, "interview": body },
        }))
        .unwrap()
    }

    #[test]
    fn test_normalizes_all_five_kinds() {
        let body = json!({
            "id": 1,
            "ownerUserId": 7,
            "date": "2024-03-05",
            "time": "10:00:00",
            "counterpartName": "Acme",
            "status": "scheduled",
        });

        for (raw, kind) in [
            ("created", ChangeKind::Created),
            ("updated", ChangeKind::Updated),
            ("status-updated", ChangeKind::StatusUpdated),
            ("result-updated", ChangeKind::ResultUpdated),
            ("deleted", ChangeKind::Deleted),
        ] {
            let event = normalize(interview_frame(raw, body.clone()))
                .unwrap()
                .unwrap();
            match event {
                TrackerEvent::Interview(ev) => assert_eq!(ev.kind, kind),
                other => panic!("expected interview event, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected_not_forwarded() {
        let body = json!({ "id": 1 });
        let err = normalize(interview_frame("archived", body)).unwrap_err();
        assert!(matches!(err, TrackerError::UnknownEventKind(k) if k == "archived"));
    }

    #[test]
    fn test_frame_without_id_is_dropped() {
        let body = json!({ "ownerUserId": 7 });
        let result = normalize(interview_frame("created", body)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_access_frame_normalizes() {
        let frame: WireFrame = serde_json::from_value(json!({
            "topic": "interview-tracker-access:update",
            "payload": {
                "type": "created",
                "access": {
                    "id": 11,
                    "grantorId": 7,
                    "granteeId": 9,
                    "createdAt": "2024-03-01T12:00:00Z",
                },
            },
        }))
        .unwrap();

        match normalize(frame).unwrap().unwrap() {
            TrackerEvent::Access(change) => {
                assert_eq!(change.kind, ChangeKind::Created);
                assert_eq!(change.grant.grantor_id, 7);
                assert_eq!(change.grant.grantee_id, 9);
            }
            other => panic!("expected access event, got {:?}", other),
        }
    }
}
