use crate::api::ApiClient;
use crate::error::ApiError;

use models::{
    AttachVolumeParams, Envelope, ListParams, PaginationResponse, StorageVolume,
    StorageVolumeDraft,
};
use serde_json::Value;

pub const VOLUMES_ENDPOINT: &str = "/storage/volumes";

#[derive(Clone)]
pub struct StorageService {
    client: ApiClient,
}

impl StorageService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list_volumes(
        &self,
        params: &ListParams,
    ) -> Result<Envelope<PaginationResponse<StorageVolume>>, ApiError> {
        self.client.get_with(VOLUMES_ENDPOINT, params).await
    }

    pub async fn get_volume(&self, id: &str) -> Result<Envelope<StorageVolume>, ApiError> {
        self.client.get(&format!("{VOLUMES_ENDPOINT}/{id}")).await
    }

    pub async fn create_volume(
        &self,
        draft: &StorageVolumeDraft,
    ) -> Result<Envelope<StorageVolume>, ApiError> {
        self.client.post(VOLUMES_ENDPOINT, draft).await
    }

    pub async fn attach_volume(
        &self,
        id: &str,
        instance_id: &str,
    ) -> Result<Envelope<Value>, ApiError> {
        let params = AttachVolumeParams {
            instance_id: instance_id.to_string(),
        };
        self.client
            .post(&format!("{VOLUMES_ENDPOINT}/{id}/attach"), &params)
            .await
    }

    pub async fn detach_volume(&self, id: &str) -> Result<Envelope<Value>, ApiError> {
        self.client
            .post_empty(&format!("{VOLUMES_ENDPOINT}/{id}/detach"))
            .await
    }

    pub async fn delete_volume(&self, id: &str) -> Result<Envelope<Value>, ApiError> {
        self.client
            .delete(&format!("{VOLUMES_ENDPOINT}/{id}"))
            .await
    }
}
