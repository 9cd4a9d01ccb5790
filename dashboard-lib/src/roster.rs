//! Roster normalization.
//!
//! Two source shapes are supported: a keyed document (`{"alice": true}`) and
//! a REST listing (`[{"agent_id": "alice", "status": "active"}]`). Both map
//! to [`Agent`] rows. Boolean `true` and the string `"active"` mean active;
//! anything else is inactive.

use serde_json::{Map, Value};
use shared::{Agent, RosterEntry};

pub fn is_active(value: &Value) -> bool {
    match value {
        Value::Bool(active) => *active,
        Value::String(status) => status == "active",
        _ => false,
    }
}

/// Normalize a keyed document. A `null` document is an explicit empty roster.
/// Rows keep the document's key order.
pub fn from_document(document: Option<Map<String, Value>>) -> Vec<Agent> {
    document
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| Agent {
            active: is_active(&value),
            name,
        })
        .collect()
}

/// Normalize a REST listing, keeping its order
pub fn from_entries(entries: Vec<RosterEntry>) -> Vec<Agent> {
    entries
        .into_iter()
        .map(|entry| Agent {
            active: is_active(&entry.status),
            name: entry.agent_id,
        })
        .collect()
}

/// Render agents back into the REST listing shape
pub fn to_entries(agents: &[Agent]) -> Vec<RosterEntry> {
    agents
        .iter()
        .map(|agent| {
            let status = if agent.active { "active" } else { "inactive" };
            RosterEntry {
                agent_id: agent.name.clone(),
                status: Value::String(status.to_string()),
            }
        })
        .collect()
}
