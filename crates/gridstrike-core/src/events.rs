//! Events emitted by the game contract, as reported in transaction effects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One event from a finalized transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEvent {
    /// Fully qualified Move event type, e.g. `0x..::game::PlayerJoined`.
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub sender: Option<String>,
    /// Event fields as JSON.
    #[serde(default)]
    pub parsed_json: Value,
}

impl GameEvent {
    /// The team a join event assigned, if this event carries one.
    pub fn team(&self) -> Option<String> {
        match self.parsed_json.get("team")? {
            Value::String(team) => Some(team.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Events listed in a transaction block response. Missing or malformed
/// `events` yield an empty list.
pub fn events_in(response: &Value) -> Vec<GameEvent> {
    response
        .get("events")
        .cloned()
        .and_then(|events| serde_json::from_value(events).ok())
        .unwrap_or_default()
}

/// Team assigned by a `join_game` transaction: the first event's `team`.
pub fn joined_team(response: &Value) -> Option<String> {
    events_in(response).first().and_then(GameEvent::team)
}

/// The failure reason of an executed transaction, or `None` on success.
///
/// A response without `effects.status` counts as a failure.
pub fn execution_error(response: &Value) -> Option<String> {
    let status = response.get("effects").and_then(|e| e.get("status"));
    match status.and_then(|s| s.get("status")).and_then(Value::as_str) {
        Some("success") => None,
        Some(_) => Some(
            status
                .and_then(|s| s.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("transaction failed")
                .to_string(),
        ),
        None => Some("response has no execution status".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_team_from_first_event() {
        let response = json!({
            "digest": "abc",
            "events": [
                {
                    "type": "0x99::game::PlayerJoined",
                    "sender": "0xbb",
                    "parsedJson": { "team": 1, "name": "Player1" }
                },
                { "type": "0x99::game::Other", "parsedJson": { "team": 2 } }
            ]
        });
        assert_eq!(joined_team(&response), Some("1".to_string()));
        assert_eq!(events_in(&response).len(), 2);
    }

    #[test]
    fn missing_events_are_empty() {
        assert!(events_in(&json!({ "digest": "abc" })).is_empty());
        assert_eq!(joined_team(&json!({ "events": [] })), None);
        assert_eq!(
            joined_team(&json!({ "events": [{ "type": "t", "parsedJson": { "team": null } }] })),
            None
        );
    }

    #[test]
    fn execution_status() {
        assert_eq!(
            execution_error(&json!({ "effects": { "status": { "status": "success" } } })),
            None
        );
        assert_eq!(
            execution_error(&json!({
                "effects": { "status": { "status": "failure", "error": "MoveAbort(3)" } }
            })),
            Some("MoveAbort(3)".to_string())
        );
        assert!(execution_error(&json!({ "digest": "abc" })).is_some());
    }
}
