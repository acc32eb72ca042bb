//! Forwarding form data to the backend endpoint.

pub mod http;
pub mod payload;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpSubmitter;
pub use payload::{Attachment, FormPayload};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission transport failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("endpoint answered with status {0}")]
    Status(u16),
    #[error("endpoint did not answer within {0:?}")]
    TimedOut(Duration),
}

/// What the endpoint answered.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitResponse {
    pub status: u16,
    /// JSON body, when the endpoint sent one.
    pub body: Option<serde_json::Value>,
}

impl SubmitResponse {
    pub fn new(status: u16) -> Self {
        Self { status, body: None }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP method a form declares for its ordinary submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Get,
    Post,
}

impl FormMethod {
    /// Parse a `method` attribute; anything but `post` is `GET`, as in HTML.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some(method) if method.trim().eq_ignore_ascii_case("post") => FormMethod::Post,
            _ => FormMethod::Get,
        }
    }
}

/// Sends the multipart submission with the generated document attached.
///
/// Any answer is returned as a [`SubmitResponse`]; only transport-level
/// failures are errors.
#[async_trait(?Send)]
pub trait Submitter {
    async fn submit(&self, action: &str, payload: FormPayload) -> Result<SubmitResponse, SubmitError>;
}

/// The form's ordinary, non-intercepted submission.
#[async_trait(?Send)]
pub trait NativeSubmit {
    async fn submit_natively(
        &self,
        action: &str,
        method: FormMethod,
        payload: FormPayload,
    ) -> Result<SubmitResponse, SubmitError>;
}
