//! Assistants API client
//!
//! Direct HTTP client for the OpenAI assistants (v2) endpoints.

use super::types::{
    AddVectorStoreFileRequest, CreateAssistantRequest, CreateMessageRequest, CreateRunRequest,
    CreateVectorStoreRequest, FileSearchResources, MessageList, ObjectRef, Run, Tool,
    ToolResources,
};
use super::{AssistantGateway, GatewayError};
use crate::config::AssistantConfig;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP implementation of `AssistantGateway`
#[derive(Clone)]
pub struct OpenAiGateway {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGateway {
    /// Build a gateway from configuration
    ///
    /// # Errors
    /// * Returns `GatewayError::Request` if the HTTP client cannot be built
    pub fn new(config: &AssistantConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(
            client,
            &config.api_key,
            &config.base_url,
            &config.model,
        ))
    }

    /// Build a gateway around an existing client (shared connection pool)
    pub fn with_client(client: reqwest::Client, api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(method = %method, url = %url, "Calling assistants API");
        self.client
            .request(method, url)
            .bearer_auth(&self.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    /// Send and turn non-success statuses into `GatewayError::Status`
    async fn send(&self, builder: RequestBuilder) -> Result<Response, GatewayError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error body".to_string());
        tracing::error!(
            status_code = status.as_u16(),
            error_body = %body,
            "Assistants API returned error status"
        );
        Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GatewayError::Decode(format!("{} - Response body: {}", e, body)))
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

#[async_trait]
impl AssistantGateway for OpenAiGateway {
    async fn create_thread(&self) -> Result<String, GatewayError> {
        let thread: ObjectRef = self
            .send_json(
                self.request(Method::POST, "/threads")
                    .json(&serde_json::json!({})),
            )
            .await?;
        Ok(thread.id)
    }

    async fn add_message_to_thread(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<(), GatewayError> {
        let body = CreateMessageRequest {
            role: "user",
            content: text,
        };
        self.send(
            self.request(Method::POST, &format!("/threads/{}/messages", thread_id))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String, GatewayError> {
        let body = CreateRunRequest { assistant_id };
        let run: Run = self
            .send_json(
                self.request(Method::POST, &format!("/threads/{}/runs", thread_id))
                    .json(&body),
            )
            .await?;
        Ok(run.id)
    }

    async fn get_run(&self, thread_id: &str, run_id: &str) -> Result<Run, GatewayError> {
        self.send_json(self.request(
            Method::GET,
            &format!("/threads/{}/runs/{}", thread_id, run_id),
        ))
        .await
    }

    async fn latest_assistant_response(&self, thread_id: &str) -> Result<String, GatewayError> {
        let messages: MessageList = self
            .send_json(
                self.request(Method::GET, &format!("/threads/{}/messages", thread_id))
                    .query(&[("order", "desc"), ("limit", "10")]),
            )
            .await?;
        messages
            .latest_assistant_text()
            .ok_or(GatewayError::EmptyResponse)
    }

    async fn create_vector_store(&self, name: &str) -> Result<String, GatewayError> {
        let store: ObjectRef = self
            .send_json(
                self.request(Method::POST, "/vector_stores")
                    .json(&CreateVectorStoreRequest { name }),
            )
            .await?;
        Ok(store.id)
    }

    async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        vector_store_id: &str,
    ) -> Result<String, GatewayError> {
        let body = CreateAssistantRequest {
            name,
            instructions,
            model: &self.model,
            tools: vec![Tool {
                tool_type: "file_search".to_string(),
            }],
            tool_resources: ToolResources {
                file_search: FileSearchResources {
                    vector_store_ids: vec![vector_store_id.to_string()],
                },
            },
        };
        let assistant: ObjectRef = self
            .send_json(self.request(Method::POST, "/assistants").json(&body))
            .await?;
        Ok(assistant.id)
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<(), GatewayError> {
        self.delete(&format!("/assistants/{}", assistant_id)).await
    }

    async fn delete_vector_store(&self, vector_store_id: &str) -> Result<(), GatewayError> {
        self.delete(&format!("/vector_stores/{}", vector_store_id))
            .await
    }

    async fn upload_file(&self, filename: &str, data: Vec<u8>) -> Result<String, GatewayError> {
        let part = reqwest::multipart::Part::bytes(data).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "assistants")
            .part("file", part);
        let file: ObjectRef = self
            .send_json(self.request(Method::POST, "/files").multipart(form))
            .await?;
        Ok(file.id)
    }

    async fn add_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<(), GatewayError> {
        self.send(
            self.request(
                Method::POST,
                &format!("/vector_stores/{}/files", vector_store_id),
            )
            .json(&AddVectorStoreFileRequest { file_id }),
        )
        .await?;
        Ok(())
    }

    async fn delete_vector_store_file(
        &self,
        vector_store_id: &str,
        file_id: &str,
    ) -> Result<(), GatewayError> {
        self.delete(&format!(
            "/vector_stores/{}/files/{}",
            vector_store_id, file_id
        ))
        .await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), GatewayError> {
        self.delete(&format!("/files/{}", file_id)).await
    }
}
