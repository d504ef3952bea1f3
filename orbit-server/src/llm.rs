use anyhow::{anyhow, bail, Result};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures_util::StreamExt;
use orbit_shared::{ChatMessage, MessageRole};
use tracing::{debug, error, info};

use crate::agent::Agent;

const SYSTEM_PROMPT: &str = "You are Orbit, a concise and friendly assistant. \
    Answer the user's latest message using the conversation so far.";

/// Agent backed by an OpenAI chat-completions stream.
pub struct OpenAiAgent {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiAgent {
    pub fn new(api_key: String, model: String) -> Self {
        info!("Initializing OpenAI agent with model: {}", model);
        let config = OpenAIConfig::new().with_api_key(api_key);
        let client = Client::with_config(config);
        Self { client, model }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_messages(&self, messages: Vec<ChatMessage>) -> Result<Vec<ChatCompletionRequestMessage>> {
        let system_message = ChatCompletionRequestMessage::System(
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT.to_string())
                .build()?,
        );

        let mut converted = Vec::with_capacity(1 + messages.len());
        converted.push(system_message);
        for msg in messages {
            converted.push(convert_message(msg)?);
        }
        Ok(converted)
    }
}

#[async_trait]
impl Agent for OpenAiAgent {
    async fn run(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.build_messages(messages)?)
            .stream(true)
            .build()?;

        debug!("Sending {} messages to OpenAI", request.messages.len());

        let mut stream = self.client.chat().create_stream(request).await.map_err(|e| {
            error!("Failed to create OpenAI stream: {:?}", e);
            anyhow!(e)
        })?;

        let mut reply = String::new();
        while let Some(result) = stream.next().await {
            match result {
                Ok(response) => {
                    if let Some(delta) = response
                        .choices
                        .first()
                        .and_then(|choice| choice.delta.content.as_deref())
                    {
                        reply.push_str(delta);
                    }
                }
                Err(e) => {
                    error!("OpenAI stream error: {:?}", e);
                    let message = match &e {
                        async_openai::error::OpenAIError::ApiError(api_err) => {
                            format!("OpenAI API Error: {}", api_err.message)
                        }
                        _ => format!("OpenAI Error: {}", e),
                    };
                    bail!(message);
                }
            }
        }

        if reply.trim().is_empty() {
            bail!("Agent returned an empty reply");
        }

        info!("Agent reply complete ({} chars)", reply.len());
        Ok(reply)
    }
}

fn convert_message(msg: ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let message = match msg.role {
        MessageRole::User => ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(msg.content)
                .build()?,
        ),
        MessageRole::Assistant => ChatCompletionRequestMessage::Assistant(
            ChatCompletionRequestAssistantMessageArgs::default()
                .content(msg.content)
                .build()?,
        ),
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_system_prompt_and_keeps_order() {
        let agent = OpenAiAgent::new("sk-test".to_string(), "gpt-4o-mini".to_string());
        let converted = agent
            .build_messages(vec![
                ChatMessage::assistant("Hi, I'm Orbit."),
                ChatMessage::user("hello"),
            ])
            .unwrap();

        assert_eq!(converted.len(), 3);
        assert!(matches!(converted[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(converted[1], ChatCompletionRequestMessage::Assistant(_)));
        assert!(matches!(converted[2], ChatCompletionRequestMessage::User(_)));
        assert_eq!(agent.model(), "gpt-4o-mini");
    }
}
