// Feature services composed over the facade.

use crate::helpers::{logged_in_harness, ok_envelope};

use client_core::services::{ComputeService, StorageService};

use models::{InstanceStatus, ListParams, PaginationParams};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn instance(status: &str) -> serde_json::Value {
    json!({
        "id": "i-1",
        "name": "web-1",
        "status": status,
        "cpu": 2,
        "memory": 4,
        "disk": 40,
        "ip": "10.0.0.1",
        "createTime": "2024-01-01 00:00:00",
        "region": "cn-north-1"
    })
}

/// **VALUE**: Starting an instance and refetching the list happen in that order.
#[tokio::test]
async fn given_stopped_instance_when_started_then_list_refetched_after() {
    // GIVEN
    let h = logged_in_harness("abc").await;
    Mock::given(method("POST"))
        .and(path("/api/compute/instances/i-1/start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/compute/instances"))
        .and(query_param("current", "1"))
        .and(query_param("pageSize", "10"))
        .and(query_param("status", "running"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!({
            "list": [instance("running")],
            "total": 1,
            "current": 1,
            "pageSize": 10
        }))))
        .expect(1)
        .mount(&h.server)
        .await;
    let compute = ComputeService::new(h.client.clone());
    let params = ListParams {
        pagination: PaginationParams::default(),
        status: Some("running".to_string()),
        ..ListParams::default()
    };

    // WHEN
    compute.start_instance("i-1").await.unwrap();
    let page = compute.list_instances(&params).await.unwrap();

    // THEN
    assert_eq!(page.data.list[0].status, InstanceStatus::Running);
    assert_eq!(page.data.page_count(), 1);
    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests[0].method.as_str(), "POST");
    assert_eq!(requests[1].method.as_str(), "GET");
}

/// **VALUE**: Attaching a volume posts the target instance id.
#[tokio::test]
async fn given_volume_when_attached_then_instance_id_posted() {
    let h = logged_in_harness("abc").await;
    Mock::given(method("POST"))
        .and(path("/api/storage/volumes/v-1/attach"))
        .and(body_json(json!({"instanceId": "i-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!(null))))
        .expect(1)
        .mount(&h.server)
        .await;
    let storage = StorageService::new(h.client.clone());

    let result = storage.attach_volume("v-1", "i-1").await;

    assert!(result.is_ok());
}
