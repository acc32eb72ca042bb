use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{FormMethod, FormPayload, NativeSubmit, SubmitError, SubmitResponse, Submitter};

/// `reqwest`-backed submitter for both the multipart and the native path.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
}

impl HttpSubmitter {
    pub fn new() -> Result<Self, SubmitError> {
        let client = Client::builder()
            .user_agent(concat!("formpress/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SubmitError::Transport)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

async fn into_response(response: reqwest::Response) -> SubmitResponse {
    let status = response.status().as_u16();
    // A missing or non-JSON body is not an error.
    let body = response.json::<serde_json::Value>().await.ok();
    SubmitResponse { status, body }
}

#[async_trait(?Send)]
impl Submitter for HttpSubmitter {
    async fn submit(&self, action: &str, payload: FormPayload) -> Result<SubmitResponse, SubmitError> {
        let mut form = Form::new();
        for (name, value) in payload.fields {
            form = form.text(name, value);
        }
        if let Some(attachment) = payload.attachment {
            let part = Part::bytes(attachment.bytes)
                .file_name(attachment.filename)
                .mime_str(&attachment.mime)
                .map_err(SubmitError::Transport)?;
            form = form.part(attachment.field, part);
        }

        let response = self
            .client
            .post(action)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .map_err(SubmitError::Transport)?;

        Ok(into_response(response).await)
    }
}

#[async_trait(?Send)]
impl NativeSubmit for HttpSubmitter {
    async fn submit_natively(
        &self,
        action: &str,
        method: FormMethod,
        payload: FormPayload,
    ) -> Result<SubmitResponse, SubmitError> {
        let request = match method {
            FormMethod::Get => self.client.get(action).query(&payload.fields),
            FormMethod::Post => self.client.post(action).form(&payload.fields),
        };
        let response = request.send().await.map_err(SubmitError::Transport)?;
        Ok(into_response(response).await)
    }
}
