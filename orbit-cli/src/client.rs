use orbit_shared::{AgentReply, AgentRequest, ErrorBody, AGENT_ROUTE};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), AGENT_ROUTE),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts the transcript and returns the agent's reply text.
    pub async fn send(&self, request: &AgentRequest) -> Result<String, ClientError> {
        debug!("Posting {} messages to {}", request.messages.len(), self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) if !body.error.is_empty() => body.error,
                _ => format!("Request failed with status {}", status.as_u16()),
            };
            warn!("Agent request failed ({}): {}", status, message);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: AgentReply = response
            .json()
            .await
            .map_err(|e| ClientError::Malformed(e.to_string()))?;
        Ok(body.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_shared::ChatMessage;
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn request() -> AgentRequest {
        AgentRequest {
            messages: vec![ChatMessage::assistant("Hi"), ChatMessage::user("hello")],
        }
    }

    #[test]
    fn endpoint_joins_base_url() {
        assert_eq!(
            AgentClient::new("http://localhost:3000/").endpoint(),
            "http://localhost:3000/api/agent"
        );
    }

    #[tokio::test]
    async fn returns_reply_on_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agent"))
            .and(body_json(json!({
                "messages": [
                    {"role": "assistant", "content": "Hi"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hi"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = AgentClient::new(&mock_server.uri());
        assert_eq!(client.send(&request()).await, Ok("hi".to_string()));
    }

    #[tokio::test]
    async fn surfaces_server_error_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/agent"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "X"})))
            .mount(&mock_server)
            .await;

        let client = AgentClient::new(&mock_server.uri());
        assert_eq!(
            client.send(&request()).await,
            Err(ClientError::Status {
                status: 400,
                message: "X".to_string()
            })
        );
    }

    #[tokio::test]
    async fn non_ok_status_without_body_is_a_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let client = AgentClient::new(&mock_server.uri());
        let err = client.send(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status 502");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_malformed() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "hi"})))
            .mount(&mock_server)
            .await;

        let client = AgentClient::new(&mock_server.uri());
        assert!(matches!(
            client.send(&request()).await,
            Err(ClientError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let client = AgentClient::new("http://127.0.0.1:1");
        assert!(matches!(
            client.send(&request()).await,
            Err(ClientError::Network(_))
        ));
    }
}
