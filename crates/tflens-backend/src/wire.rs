//! Response envelopes of the backend JSON API

use serde::Deserialize;

use tflens_core::{GroupKey, GroupSummary, PairingMode, RunId, TimelineBar};

/// `GET timeline/` response
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub items: Vec<TimelineBar>,
}

/// `GET logs/groups` response
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub run_id: Option<RunId>,
    #[serde(default)]
    pub pair_by: Option<String>,
    #[serde(default)]
    pub total_groups: Option<u64>,
    #[serde(default)]
    pub groups: Vec<GroupSummary>,
}

/// Placeholder keys the backend reports for entries lacking a value.
///
/// Matched loosely: any parenthesised key is a placeholder, since real
/// correlation ids, phases and `type:name` pairs never start with `(`.
fn is_backend_placeholder(key: &str) -> bool {
    key.starts_with('(') && key.ends_with(')')
}

impl GroupsResponse {
    /// Group rows with placeholder keys rewritten to the local sentinel
    /// form, so they match the keys produced for fetched entries.
    pub fn into_groups(self, pairing: PairingMode) -> Vec<GroupSummary> {
        self.groups
            .into_iter()
            .map(|mut g| {
                if is_backend_placeholder(&g.key) {
                    let key = pairing.sentinel();
                    g.key = key.storage_key();
                    g.display_name = key.label();
                } else {
                    let key = GroupKey::parse(pairing, &g.key);
                    g.key = key.storage_key();
                    if g.display_name.is_empty() {
                        g.display_name = key.label();
                    }
                }
                g
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tflens_core::{NO_CORRELATION, NO_RESOURCE};

    #[test]
    fn test_placeholder_keys_become_sentinels() {
        let json = r#"{
            "run_id": 1, "pair_by": "tf_req_id", "total_groups": 2,
            "groups": [
                {"key": "r1", "display_name": "r1", "type": "tf_req_id", "count": 3},
                {"key": "(без tf_req_id)", "display_name": "(без tf_req_id)", "type": "tf_req_id", "count": 1}
            ]
        }"#;
        let resp: GroupsResponse = serde_json::from_str(json).unwrap();
        let groups = resp.into_groups(PairingMode::Correlation);
        assert_eq!(groups[0].key, "r1");
        assert_eq!(groups[1].key, NO_CORRELATION);
        assert_eq!(groups[1].display_name, "(no correlation id)");
    }

    #[test]
    fn test_bare_separator_resource_key_normalized() {
        let json = r#"{"groups": [{"key": ":", "display_name": "", "type": "resource", "count": 2}]}"#;
        let resp: GroupsResponse = serde_json::from_str(json).unwrap();
        let groups = resp.into_groups(PairingMode::Resource);
        assert_eq!(groups[0].key, NO_RESOURCE);
    }

    #[test]
    fn test_timeline_response_defaults_to_empty() {
        let resp: TimelineResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.items.is_empty());
    }
}
