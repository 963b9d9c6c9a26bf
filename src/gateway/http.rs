use super::{Gateway, GatewayError, GatewayResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const CHAT_PATH: &str = "/api/chat";
pub const IMAGE_PATH: &str = "/api/generate-image";

/// Gateway speaking the backend's JSON-over-HTTP protocol.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ImageBody<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct ReplyBody {
    response: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> GatewayResult<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "dispatching request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::new(format!("{path} returned {status}: {body}")));
        }

        let reply: ReplyBody = serde_json::from_str(&body)?;
        Ok(reply.response)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Gateway for HttpGateway {
    async fn chat(&self, text: &str) -> GatewayResult<String> {
        self.post(CHAT_PATH, &ChatBody { message: text }).await
    }

    async fn generate_image(&self, prompt: &str) -> GatewayResult<String> {
        self.post(IMAGE_PATH, &ImageBody { prompt }).await
    }
}
