use crate::{ListParams, PaginationParams, PaginationResponse};

use serde_json::json;

/// **VALUE**: Zero page numbers and sizes are rejected before any request is built.
#[test]
fn given_zero_page_when_pagination_created_then_validation_error() {
    assert!(PaginationParams::new(0, 10).is_err());
    assert!(PaginationParams::new(1, 0).is_err());
    assert!(PaginationParams::new(1, 10).is_ok());
}

/// **VALUE**: List params flatten pagination into one camelCase query object.
///
/// **WHY THIS MATTERS**: The backend expects `current=1&pageSize=10&status=running`, not a
/// nested `pagination` object.
#[test]
fn given_list_params_when_serialized_then_pagination_is_flattened() {
    let params = ListParams {
        status: Some("running".to_string()),
        ..ListParams::default()
    };

    let value = serde_json::to_value(&params).unwrap();

    assert_eq!(
        value,
        json!({"current": 1, "pageSize": 10, "status": "running"})
    );
}

/// **VALUE**: Page count and row range derive from the response metadata.
#[test]
fn given_pagination_response_when_queried_then_derives_pages_and_rows() {
    let page: PaginationResponse<u32> = serde_json::from_value(json!({
        "list": [1, 2, 3],
        "total": 23,
        "current": 3,
        "pageSize": 10
    }))
    .unwrap();

    assert_eq!(page.page_count(), 3);
    assert_eq!(page.row_range(), (21, 23));
}
