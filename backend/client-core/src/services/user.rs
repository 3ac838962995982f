use crate::api::ApiClient;
use crate::error::ApiError;
use crate::request::UploadFile;

use log::info;
use models::{
    AvatarUploadResponse, ChangePasswordParams, Envelope, LoginParams, LoginResponse,
    RefreshTokenParams, RefreshTokenResponse, UserInfo,
};
use serde_json::Value;

pub const LOGIN_ENDPOINT: &str = "/auth/login";
pub const LOGOUT_ENDPOINT: &str = "/auth/logout";
pub const REFRESH_ENDPOINT: &str = "/auth/refresh";
pub const USER_INFO_ENDPOINT: &str = "/user/info";
pub const CHANGE_PASSWORD_ENDPOINT: &str = "/user/change-password";
pub const AVATAR_ENDPOINT: &str = "/user/avatar";

#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Authenticate and store the returned token (and profile, when sent).
    pub async fn login(&self, params: &LoginParams) -> Result<Envelope<LoginResponse>, ApiError> {
        let response = self
            .client
            .post::<LoginResponse, _>(LOGIN_ENDPOINT, params)
            .await?;

        let credentials = self.client.credentials();
        credentials.set_token(&response.data.token());
        if let Some(user) = &response.data.user_info {
            credentials.set_user_info(user);
        }
        info!("Logged in as {}", params.username);

        Ok(response)
    }

    /// Fetch the profile and refresh the cached copy.
    pub async fn get_user_info(&self) -> Result<Envelope<UserInfo>, ApiError> {
        let response = self.client.get::<UserInfo>(USER_INFO_ENDPOINT).await?;
        self.client.credentials().set_user_info(&response.data);
        Ok(response)
    }

    /// Profile cached by the last login or profile fetch.
    pub fn cached_user_info(&self) -> Option<UserInfo> {
        self.client.credentials().user_info()
    }

    pub fn is_logged_in(&self) -> bool {
        self.client.credentials().token().is_some()
    }

    pub async fn update_user_info(&self, user: &UserInfo) -> Result<Envelope<UserInfo>, ApiError> {
        self.client.put(USER_INFO_ENDPOINT, user).await
    }

    pub async fn change_password(
        &self,
        params: &ChangePasswordParams,
    ) -> Result<Envelope<Value>, ApiError> {
        self.client.post(CHANGE_PASSWORD_ENDPOINT, params).await
    }

    pub async fn upload_avatar(
        &self,
        file: UploadFile,
    ) -> Result<Envelope<AvatarUploadResponse>, ApiError> {
        self.client
            .upload(AVATAR_ENDPOINT, file, Vec::<(String, String)>::new())
            .await
    }

    /// Tell the server, then drop local credentials whatever it answered.
    pub async fn logout(&self) -> Result<Envelope<Value>, ApiError> {
        let result = self.client.post_empty::<Value>(LOGOUT_ENDPOINT).await;
        self.client.credentials().clear_session();
        result
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Not called automatically on 401; an expired session always goes back
    /// to the login page.
    pub async fn refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Envelope<RefreshTokenResponse>, ApiError> {
        let params = RefreshTokenParams {
            refresh_token: refresh_token.to_string(),
        };
        self.client.post(REFRESH_ENDPOINT, &params).await
    }
}
