use crate::api::ApiClient;
use crate::error::ApiError;

use models::{ComputeInstance, ComputeInstanceDraft, Envelope, ListParams, PaginationResponse};
use serde_json::Value;

pub const INSTANCES_ENDPOINT: &str = "/compute/instances";

#[derive(Clone)]
pub struct ComputeService {
    client: ApiClient,
}

impl ComputeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_instances(
        &self,
        params: &ListParams,
    ) -> Result<Envelope<PaginationResponse<ComputeInstance>>, ApiError> {
        self.client.get_with(INSTANCES_ENDPOINT, params).await
    }

    pub async fn get_instance(&self, id: &str) -> Result<Envelope<ComputeInstance>, ApiError> {
        self.client.get(&instance_url(id)).await
    }

    pub async fn create_instance(
        &self,
        draft: &ComputeInstanceDraft,
    ) -> Result<Envelope<ComputeInstance>, ApiError> {
        self.client.post(INSTANCES_ENDPOINT, draft).await
    }

    pub async fn start_instance(&self, id: &str) -> Result<Envelope<Value>, ApiError> {
        self.client.post_empty(&action_url(id, "start")).await
    }

    pub async fn stop_instance(&self, id: &str) -> Result<Envelope<Value>, ApiError> {
        self.client.post_empty(&action_url(id, "stop")).await
    }

    pub async fn reboot_instance(&self, id: &str) -> Result<Envelope<Value>, ApiError> {
        self.client.post_empty(&action_url(id, "reboot")).await
    }

    pub async fn delete_instance(&self, id: &str) -> Result<Envelope<Value>, ApiError> {
        self.client.delete(&instance_url(id)).await
    }
}

fn instance_url(id: &str) -> String {
    format!("{INSTANCES_ENDPOINT}/{id}")
}

fn action_url(id: &str, action: &str) -> String {
    format!("{INSTANCES_ENDPOINT}/{id}/{action}")
}
