use crate::request::query::to_query_pairs;

use models::ListParams;
use serde_json::json;

/// **VALUE**: Typed list params flatten into camelCase query pairs, skipping unset fields.
#[test]
fn given_list_params_when_flattened_then_camel_case_pairs_without_nulls() {
    let params = ListParams {
        region: Some("eu-west".to_string()),
        ..ListParams::default()
    };

    let pairs = to_query_pairs(&params).unwrap();

    assert!(pairs.contains(&("current".to_string(), "1".to_string())));
    assert!(pairs.contains(&("pageSize".to_string(), "10".to_string())));
    assert!(pairs.contains(&("region".to_string(), "eu-west".to_string())));
    assert!(!pairs.iter().any(|(k, _)| k == "status"));
}

/// **VALUE**: Arrays repeat the key; nested objects travel as JSON; nulls vanish.
#[test]
fn given_mixed_values_when_flattened_then_each_shape_is_handled() {
    let pairs = to_query_pairs(&json!({
        "ids": ["a", "b"],
        "filter": {"status": "running"},
        "empty": null,
        "active": true
    }))
    .unwrap();

    assert_eq!(pairs.iter().filter(|(k, _)| k == "ids").count(), 2);
    assert!(pairs.contains(&("filter".to_string(), r#"{"status":"running"}"#.to_string())));
    assert!(pairs.contains(&("active".to_string(), "true".to_string())));
    assert!(!pairs.iter().any(|(k, _)| k == "empty"));
}

/// **VALUE**: Non-object params are rejected instead of silently dropped.
#[test]
fn given_scalar_params_when_flattened_then_error() {
    assert!(to_query_pairs(&42).is_err());
    assert!(to_query_pairs(&()).unwrap().is_empty());
}
