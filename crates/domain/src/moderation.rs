//! Moderation requests and their decision lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryKind};
use crate::ids::RequestId;

/// Moderator verdict on a request.
///
/// Transitions at most once: `Undecided -> Approved` or
/// `Undecided -> Denied`. Decided states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Undecided,
    Approved,
    Denied,
}

impl Decision {
    pub fn is_undecided(&self) -> bool {
        matches!(self, Self::Undecided)
    }

    pub fn from_approved(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Denied
        }
    }
}

/// A submitted entry awaiting (or past) a moderator decision.
///
/// Owned exclusively by the moderation queue; collaborators hold only the
/// [`RequestId`]. The kind is fixed at creation and selects the store write
/// path on approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub id: RequestId,
    pub kind: EntryKind,
    pub submitted_at: DateTime<Utc>,
    pub entry: Entry,
    pub decision: Decision,
}

impl ModerationRequest {
    pub fn new(id: RequestId, entry: Entry, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: entry.kind(),
            submitted_at,
            entry,
            decision: Decision::Undecided,
        }
    }

    /// Apply a verdict. Returns `false` without changing anything when the
    /// request was already decided.
    pub fn decide(&mut self, approved: bool) -> bool {
        if !self.decision.is_undecided() {
            return false;
        }
        self.decision = Decision::from_approved(approved);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::BlacklistEntry;
    use chrono::TimeZone;

    fn request() -> ModerationRequest {
        let entry = Entry::Blacklist(BlacklistEntry {
            game_name: "Cheater".to_string(),
        });
        let submitted_at = Utc.timestamp_opt(1_700_000_000, 0).single().expect("valid ts");
        ModerationRequest::new(RequestId::new(), entry, submitted_at)
    }

    #[test]
    fn new_request_is_undecided_and_kind_matched() {
        let request = request();
        assert_eq!(request.decision, Decision::Undecided);
        assert_eq!(request.kind, EntryKind::Blacklist);
    }

    #[test]
    fn first_decision_wins() {
        let mut request = request();
        assert!(request.decide(true));
        assert_eq!(request.decision, Decision::Approved);
    }

    #[test]
    fn decided_requests_never_transition_again() {
        let mut request = request();
        assert!(request.decide(false));
        assert_eq!(request.decision, Decision::Denied);

        // Replays are no-ops regardless of the attempted verdict.
        assert!(!request.decide(true));
        assert!(!request.decide(false));
        assert_eq!(request.decision, Decision::Denied);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let request = request();
        let json = serde_json::to_value(&request).expect("serialize");
        assert!(json.get("submittedAt").is_some());
        assert_eq!(json["kind"], "blacklist");
        assert_eq!(json["decision"], "undecided");
        assert_eq!(json["entry"]["gameName"], "Cheater");
    }
}
