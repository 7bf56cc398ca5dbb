//! Tests for ResponseRenderer and group filtering

mod support;

use std::collections::BTreeSet;

use rstest::rstest;
use serde_json::{json, Value};

use pccctl::application::services::{OutputFormat, ResponseRenderer};
use pccctl::application::{ApplicationError, RenderError};
use pccctl::domain::command::parse_groups;
use pccctl::domain::{CommandKind, ResponseEnvelope};

use support::REGIONS_RESPONSE;

fn groups(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn given_regions_when_rendering_table_then_prints_rows_and_summary() {
    let table = ResponseRenderer::new()
        .render(
            REGIONS_RESPONSE,
            &CommandKind::ListRegions,
            OutputFormat::Table,
            None,
        )
        .unwrap();
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(lines[0], "Status Code: OK");
    assert_eq!(
        lines[2],
        " name               | type               | groups             | entryCount         | regionAttributes   |"
    );
    assert_eq!(
        lines[4],
        " region1            | PARTITION          | [groupA, groupB]   | 5                  |                    |"
    );
    assert_eq!(lines.last().copied(), Some("Number of Regions: 3"));
}

#[test]
fn given_group_filter_when_rendering_table_then_only_matching_rows_remain() {
    let wanted = groups(&["groupA"]);
    let table = ResponseRenderer::new()
        .render(
            REGIONS_RESPONSE,
            &CommandKind::ListRegions,
            OutputFormat::Table,
            Some(&wanted),
        )
        .unwrap();

    assert!(table.contains(" region1 "));
    assert!(!table.contains(" region2 "));
    assert!(!table.contains(" region3 "));
    assert!(table.ends_with("Number of Regions: 1"));
}

#[test]
fn given_envelope_when_rendering_json_then_keeps_envelope_and_field_order() {
    let raw = r#"{"result":[{"name":"r1","type":"PARTITION"}],"statusMessage":"done","statusCode":"OK"}"#;
    let text = ResponseRenderer::new()
        .render(raw, &CommandKind::ListRegions, OutputFormat::Json, None)
        .unwrap();

    let status_code = text.find("\"statusCode\"").unwrap();
    let status_message = text.find("\"statusMessage\"").unwrap();
    let result = text.find("\"result\"").unwrap();
    assert!(status_code < status_message && status_message < result);
    assert!(text.find("\"name\"").unwrap() < text.find("\"type\"").unwrap());
    assert!(text.contains("\n  \"statusCode\": \"OK\""));
}

#[test]
fn given_filtered_envelope_when_rendering_json_then_parses_back_to_filtered_envelope() {
    let renderer = ResponseRenderer::new();
    let wanted = groups(&["groupB", "groupC"]);

    let text = renderer
        .render(
            REGIONS_RESPONSE,
            &CommandKind::ListRegions,
            OutputFormat::Json,
            Some(&wanted),
        )
        .unwrap();
    let reparsed: ResponseEnvelope = serde_json::from_str(&text).unwrap();

    let expected = renderer
        .parse(REGIONS_RESPONSE)
        .unwrap()
        .filtered_by_groups(&wanted);
    assert_eq!(reparsed, expected);
    assert_eq!(reparsed.result.len(), 2);
}

#[test]
fn given_group_filter_when_applied_twice_then_result_is_unchanged() {
    let envelope = ResponseRenderer::new().parse(REGIONS_RESPONSE).unwrap();
    let wanted = parse_groups("groupA, ,groupC");

    let once = envelope.filtered_by_groups(&wanted);
    let twice = once.filtered_by_groups(&wanted);

    assert_eq!(once, twice);
    assert_eq!(once.status_code, envelope.status_code);
}

#[rstest]
#[case::string_list(json!("[groupA, groupB]"), true)]
#[case::plain_string(json!("groupA"), true)]
#[case::comma_separated(json!("groupB,groupA"), true)]
#[case::json_array(json!(["groupX", "groupA"]), true)]
#[case::other_group(json!("[groupC]"), false)]
#[case::prefix_only(json!("[groupAB]"), false)]
#[case::null(Value::Null, false)]
fn given_groups_field_when_filtering_then_matches_whole_group_names(
    #[case] groups_value: Value,
    #[case] kept: bool,
) {
    let raw = json!({"statusCode": "OK", "result": [{"name": "r1", "groups": groups_value}]});
    let envelope = ResponseRenderer::new().parse(&raw.to_string()).unwrap();

    let filtered = envelope.filtered_by_groups(&groups(&["groupA"]));

    assert_eq!(filtered.result.len(), usize::from(kept));
}

#[test]
fn given_null_result_and_member_status_when_parsing_then_treated_as_empty() {
    let envelope = ResponseRenderer::new()
        .parse(r#"{"statusCode":"OK","result":null,"memberStatus":null}"#)
        .unwrap();
    assert!(envelope.result.is_empty());
    assert!(envelope.member_status.is_empty());
}

#[test]
fn given_member_status_aliases_when_parsing_then_reads_server_name() {
    let envelope = ResponseRenderer::new()
        .parse(
            r#"{"statusCode":"OK","memberStatus":[
                {"memberName":"server1","success":true,"message":"created"},
                {"ServerName":"server2","Success":false,"Message":"failed"}
            ]}"#,
        )
        .unwrap();
    assert_eq!(envelope.member_status[0].server_name, "server1");
    assert!(envelope.member_status[0].success);
    assert_eq!(envelope.member_status[1].server_name, "server2");
    assert_eq!(envelope.member_status[1].message, "failed");
}

#[test]
fn given_missing_status_code_when_rendering_then_uses_empty_code() {
    let table = ResponseRenderer::new()
        .render(
            r#"{"result":[]}"#,
            &CommandKind::ListMembers,
            OutputFormat::Table,
            None,
        )
        .unwrap();
    assert!(table.starts_with("Status Code: \n\n"));
    assert!(table.ends_with("Number of Members: 0"));
}

#[rstest]
#[case::not_json("Internal Server Error")]
#[case::truncated(r#"{"statusCode":"OK","result":["#)]
#[case::top_level_array(r#"[{"name":"r1"}]"#)]
#[case::wrong_result_shape(r#"{"statusCode":"OK","result":"r1"}"#)]
fn given_malformed_body_when_rendering_then_invalid_envelope(#[case] raw: &str) {
    let err = ResponseRenderer::new()
        .render(raw, &CommandKind::ListRegions, OutputFormat::Table, None)
        .unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Render(RenderError::InvalidEnvelope { .. })
    ));
}
