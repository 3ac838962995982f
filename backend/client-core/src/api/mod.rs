//! The API facade.
//!
//! [`ApiClient`] is what feature code calls. Every verb builds a
//! [`RequestDescriptor`], runs it through the shared [`Pipeline`] and the
//! [`Transport`], and returns the full [`Envelope`] so messages and
//! pagination metadata stay available.
//!
//! Failures come back as [`ApiError`] after the user has been notified;
//! callers only handle them programmatically.

pub mod download;

pub use download::{DownloadTarget, FileDownloadTarget, ObjectGuard, ObjectUrl};

use crate::collaborator::{Navigator, NoticeKind, Notifier};
use crate::config::ClientConfig;
use crate::credential::{CredentialStore, Credentials};
use crate::error::{ApiError, ConfigError, DownloadError};
use crate::pipeline::Pipeline;
use crate::request::query::to_query_pairs;
use crate::request::{MultipartPayload, RequestBody, RequestDescriptor, ResponseType, UploadFile};
use crate::transport::Transport;

use std::path::PathBuf;
use std::sync::Arc;

use log::error;
use models::Envelope;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const SAVE_FAILED_MESSAGE: &str = "Download could not be saved";

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Transport,
    pipeline: Pipeline,
    credentials: Credentials,
    download_target: Arc<dyn DownloadTarget>,
}

impl ApiClient {
    pub fn new(
        transport: Transport,
        pipeline: Pipeline,
        credentials: Credentials,
        download_target: Arc<dyn DownloadTarget>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                pipeline,
                credentials,
                download_target,
            }),
        }
    }

    /// Client with the standard pipeline, saving downloads into the configured dir.
    pub fn from_config(
        config: &ClientConfig,
        store: Arc<dyn CredentialStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let transport = Transport::from_config(config)?;
        let credentials = Credentials::new(store);
        let pipeline = Pipeline::standard(
            credentials.clone(),
            notifier,
            navigator,
            &config.login_path,
            config.debug_requests,
        );
        let download_target = Arc::new(FileDownloadTarget::new(config.resolve_download_dir()));

        Ok(Self::new(transport, pipeline, credentials, download_target))
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        self.inner.pipeline.classifier().notifier()
    }

    /// Run one descriptor through the pipeline and classify the outcome.
    pub async fn request<T>(&self, descriptor: RequestDescriptor) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let descriptor = self.inner.pipeline.prepare(descriptor)?;
        let outcome = self.inner.transport.execute(&descriptor).await;
        self.inner.pipeline.classifier().classify(outcome)
    }

    pub async fn get<T>(&self, url: &str) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(RequestDescriptor::get(url)).await
    }

    pub async fn get_with<T, P>(&self, url: &str, params: &P) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::get(url).with_query(self.query(params)?);
        self.request(descriptor).await
    }

    pub async fn post<T, B>(&self, url: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(self.with_json(Method::POST, url, body)?).await
    }

    pub async fn post_empty<T>(&self, url: &str) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(RequestDescriptor::new(Method::POST, url)).await
    }

    pub async fn put<T, B>(&self, url: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(self.with_json(Method::PUT, url, body)?).await
    }

    pub async fn put_empty<T>(&self, url: &str) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(RequestDescriptor::new(Method::PUT, url)).await
    }

    pub async fn delete<T>(&self, url: &str) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(RequestDescriptor::new(Method::DELETE, url)).await
    }

    pub async fn patch<T, B>(&self, url: &str, body: &B) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(self.with_json(Method::PATCH, url, body)?).await
    }

    pub async fn patch_empty<T>(&self, url: &str) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        self.request(RequestDescriptor::new(Method::PATCH, url)).await
    }

    /// POST a multipart form: the file under `file` plus scalar fields.
    pub async fn upload<T, K, V>(
        &self,
        url: &str,
        file: UploadFile,
        fields: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
        K: Into<String>,
        V: ToString,
    {
        let fields = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.to_string()))
            .collect();
        let descriptor = RequestDescriptor::new(Method::POST, url)
            .with_body(RequestBody::Multipart(MultipartPayload { file, fields }));
        self.request(descriptor).await
    }

    /// Fetch raw bytes and save them through the download target.
    pub async fn download(
        &self,
        url: &str,
        filename: Option<&str>,
    ) -> Result<PathBuf, DownloadError> {
        self.download_descriptor(RequestDescriptor::get(url), filename)
            .await
    }

    pub async fn download_with<P>(
        &self,
        url: &str,
        filename: Option<&str>,
        params: &P,
    ) -> Result<PathBuf, DownloadError>
    where
        P: Serialize + ?Sized,
    {
        let descriptor = RequestDescriptor::get(url).with_query(self.query(params)?);
        self.download_descriptor(descriptor, filename).await
    }

    async fn download_descriptor(
        &self,
        descriptor: RequestDescriptor,
        filename: Option<&str>,
    ) -> Result<PathBuf, DownloadError> {
        let descriptor = self
            .inner
            .pipeline
            .prepare(descriptor.with_response_type(ResponseType::Blob))?;
        let outcome = self.inner.transport.execute(&descriptor).await;
        let bytes = self.inner.pipeline.classifier().classify_blob(outcome)?;

        let filename = filename.unwrap_or(download::DEFAULT_DOWNLOAD_NAME);
        let target = self.inner.download_target.as_ref();

        let object = target
            .create_object(&bytes)
            .map_err(|e| self.save_failed(filename, e))?;
        let guard = ObjectGuard::new(target, object);

        target
            .trigger_save(guard.object(), filename)
            .map_err(|e| self.save_failed(filename, e))
    }

    fn save_failed(&self, filename: &str, source: std::io::Error) -> DownloadError {
        error!("Failed to save download '{}': {}", filename, source);
        self.notifier().notify(NoticeKind::Error, SAVE_FAILED_MESSAGE);
        DownloadError::save(filename, source)
    }

    fn query<P>(&self, params: &P) -> Result<Vec<(String, String)>, ApiError>
    where
        P: Serialize + ?Sized,
    {
        to_query_pairs(params).map_err(|detail| {
            self.inner
                .pipeline
                .classifier()
                .reject(crate::transport::ExchangeFailure::NotSent { detail })
        })
    }

    fn with_json<B>(&self, method: Method, url: &str, body: &B) -> Result<RequestDescriptor, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body).map_err(|e| {
            self.inner
                .pipeline
                .classifier()
                .reject(crate::transport::ExchangeFailure::not_sent(e.to_string()))
        })?;
        Ok(RequestDescriptor::new(method, url).with_body(RequestBody::Json(value)))
    }
}
