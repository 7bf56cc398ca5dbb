//! Management API response envelope and group filtering

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field of a result record holding its group membership.
pub const GROUPS_FIELD: &str = "groups";

/// One result record: field → dynamically typed value.
pub type Record = Map<String, Value>;

/// Outcome reported by a single cluster member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberStatus {
    #[serde(
        alias = "memberName",
        alias = "ServerName",
        deserialize_with = "null_as_default"
    )]
    pub server_name: String,
    #[serde(alias = "Success", deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(alias = "Message", deserialize_with = "null_as_default")]
    pub message: String,
}

/// Standard wrapper of every management API response.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_status: Vec<MemberStatus>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: Vec<Record>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResponseEnvelope {
    /// Keep only records whose groups intersect `wanted`.
    ///
    /// All other envelope fields are left untouched.
    pub fn retain_groups(&mut self, wanted: &BTreeSet<String>) {
        self.result.retain(|record| record_in_groups(record, wanted));
    }

    /// Copy of the envelope restricted to records in `wanted` groups.
    pub fn filtered_by_groups(&self, wanted: &BTreeSet<String>) -> Self {
        let mut filtered = self.clone();
        filtered.retain_groups(wanted);
        filtered
    }
}

/// Check if a record belongs to at least one of the `wanted` groups.
///
/// Records without a `groups` field never match.
pub fn record_in_groups(record: &Record, wanted: &BTreeSet<String>) -> bool {
    record
        .get(GROUPS_FIELD)
        .map(|groups| group_names(groups).iter().any(|g| wanted.contains(g)))
        .unwrap_or(false)
}

/// Group names of a `groups` value.
///
/// Strings like `[groupA, groupB]` or `groupA groupB` are split on whitespace,
/// commas and brackets; lists contribute each element.
pub fn group_names(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => split_group_list(s),
        Value::Array(items) => items.iter().flat_map(group_names).collect(),
        Value::Null => Vec::new(),
        other => split_group_list(&other.to_string()),
    }
}

fn split_group_list(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, ',' | '[' | ']'))
        .filter(|g| !g.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wanted(groups: &[&str]) -> BTreeSet<String> {
        groups.iter().map(|g| g.to_string()).collect()
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn given_bracketed_group_string_when_matching_then_finds_each_group() {
        let r = record(json!({"name": "r1", "groups": "[groupA, groupB]"}));
        assert!(record_in_groups(&r, &wanted(&["groupA"])));
        assert!(record_in_groups(&r, &wanted(&["groupB", "groupX"])));
        assert!(!record_in_groups(&r, &wanted(&["group"])));
    }

    #[test]
    fn given_group_list_when_matching_then_uses_elements() {
        let r = record(json!({"groups": ["groupA", "groupB"]}));
        assert!(record_in_groups(&r, &wanted(&["groupB"])));
    }

    #[test]
    fn given_record_without_groups_when_matching_then_excluded() {
        let r = record(json!({"name": "r1"}));
        assert!(!record_in_groups(&r, &wanted(&["groupA"])));
        let r = record(json!({"name": "r1", "groups": null}));
        assert!(!record_in_groups(&r, &wanted(&["groupA"])));
    }

    #[test]
    fn given_envelope_when_filtering_then_only_result_changes() {
        let mut envelope: ResponseEnvelope = serde_json::from_value(json!({
            "statusCode": "OK",
            "statusMessage": "done",
            "memberStatus": [{"serverName": "server1", "success": true, "message": ""}],
            "result": [
                {"name": "r1", "groups": "[groupA, groupB]"},
                {"name": "r2", "groups": "[groupC]"}
            ]
        }))
        .unwrap();
        let members = envelope.member_status.clone();

        envelope.retain_groups(&wanted(&["groupA"]));

        assert_eq!(envelope.status_code, "OK");
        assert_eq!(envelope.status_message.as_deref(), Some("done"));
        assert_eq!(envelope.member_status, members);
        assert_eq!(envelope.result.len(), 1);
        assert_eq!(envelope.result[0]["name"], json!("r1"));
    }

    #[test]
    fn given_null_collections_when_parsing_then_empty() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"statusCode": null, "memberStatus": null, "result": null}"#)
                .unwrap();
        assert_eq!(envelope, ResponseEnvelope::default());
    }

    #[test]
    fn given_null_member_fields_when_parsing_then_zero_values() {
        let envelope: ResponseEnvelope = serde_json::from_str(
            r#"{"statusCode": "OK",
                "memberStatus": [{"serverName": null, "success": null, "message": "x"}],
                "result": []}"#,
        )
        .unwrap();
        assert_eq!(
            envelope.member_status,
            vec![MemberStatus {
                server_name: String::new(),
                success: false,
                message: "x".into(),
            }]
        );
    }

    #[test]
    fn given_member_name_alias_when_parsing_then_fills_server_name() {
        let envelope: ResponseEnvelope = serde_json::from_str(
            r#"{"statusCode": "OK", "memberStatus": [{"memberName": "locator1", "success": true}]}"#,
        )
        .unwrap();
        assert_eq!(envelope.member_status[0].server_name, "locator1");
        assert!(envelope.member_status[0].success);
    }
}
