//! The request/response pipeline.
//!
//! A [`Pipeline`] is built once: an ordered list of request interceptors and
//! a single [`ResponseClassifier`]. The API facade shares it by reference
//! with every call; there is no global client.

pub mod classifier;
pub mod request;
pub mod status_table;

pub use classifier::ResponseClassifier;
pub use request::{
    AuthHeaderInterceptor, CACHE_BUST_PARAM, CacheBustInterceptor, RequestInterceptor,
    RequestLogInterceptor,
};
pub use status_table::{SideEffect, StatusResolution, StatusRule, StatusTable};

use crate::collaborator::{Navigator, Notifier};
use crate::credential::Credentials;
use crate::error::ApiError;
use crate::request::RequestDescriptor;

use std::sync::Arc;

pub struct Pipeline {
    interceptors: Vec<Box<dyn RequestInterceptor>>,
    classifier: ResponseClassifier,
}

impl Pipeline {
    pub fn new(classifier: ResponseClassifier) -> Self {
        Self {
            interceptors: Vec::new(),
            classifier,
        }
    }

    /// Auth header, cache-busting and request logging, in that order.
    pub fn standard(
        credentials: Credentials,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        login_path: &str,
        debug_requests: bool,
    ) -> Self {
        let classifier = ResponseClassifier::new(credentials.clone(), notifier, navigator, login_path)
            .with_response_logging(debug_requests);

        Self::new(classifier)
            .with_interceptor(AuthHeaderInterceptor::new(credentials))
            .with_interceptor(CacheBustInterceptor::new())
            .with_interceptor(RequestLogInterceptor::new(debug_requests))
    }

    /// Append an interceptor to the end of the chain.
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    pub fn classifier(&self) -> &ResponseClassifier {
        &self.classifier
    }

    /// Run every interceptor in order.
    ///
    /// A failing interceptor is classified as a configuration error and the
    /// remaining stages are skipped.
    pub fn prepare(&self, descriptor: RequestDescriptor) -> Result<RequestDescriptor, ApiError> {
        self.interceptors
            .iter()
            .try_fold(descriptor, |descriptor, interceptor| {
                interceptor.intercept(descriptor)
            })
            .map_err(|failure| self.classifier.reject(failure))
    }
}
