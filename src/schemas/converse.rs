//! Bedrock Converse API request and reply
//!
//! These mirror the JSON shape of the Converse operation. The Bedrock backend
//! translates them to and from the SDK types, which keeps the invoker
//! testable without the SDK.

use serde::{Deserialize, Serialize};

use super::anthropic::NO_RESPONSE_TEXT;
use crate::config::InferenceParams;

/// Text content block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverseText {
    pub text: String,
}

/// Conversation message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConverseMessage {
    pub role: String,
    pub content: Vec<ConverseText>,
}

impl ConverseMessage {
    /// Create a user message with text content.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: vec![ConverseText { text: text.into() }],
        }
    }
}

/// Inference configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConverseInferenceConfig {
    pub max_tokens: i32,
    pub temperature: f32,
}

impl From<InferenceParams> for ConverseInferenceConfig {
    fn from(params: InferenceParams) -> Self {
        Self {
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        }
    }
}

/// Converse request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConverseRequest {
    pub model_id: String,
    pub messages: Vec<ConverseMessage>,
    pub inference_config: ConverseInferenceConfig,
}

impl ConverseRequest {
    /// Build a single user-turn request
    pub fn user(model_id: impl Into<String>, query: impl Into<String>, params: InferenceParams) -> Self {
        Self {
            model_id: model_id.into(),
            messages: vec![ConverseMessage::user(query)],
            inference_config: params.into(),
        }
    }
}

/// Content block of a reply; non-text blocks carry no `text`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConverseReplyContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Reply message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConverseReplyMessage {
    #[serde(default)]
    pub content: Vec<ConverseReplyContent>,
}

/// Reply `output` union; only the message member is modeled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConverseReplyOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ConverseReplyMessage>,
}

/// Converse reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConverseReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ConverseReplyOutput>,
}

impl ConverseReply {
    /// Reply whose message holds a single text block
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            output: Some(ConverseReplyOutput {
                message: Some(ConverseReplyMessage {
                    content: vec![ConverseReplyContent {
                        text: Some(text.into()),
                    }],
                }),
            }),
        }
    }

    /// `output.message.content[0].text`, if present
    pub fn first_text(&self) -> Option<&str> {
        self.output
            .as_ref()
            .and_then(|output| output.message.as_ref())
            .and_then(|message| message.content.first())
            .and_then(|block| block.text.as_deref())
    }

    /// First text, or [`NO_RESPONSE_TEXT`] when there is none
    pub fn into_text(self) -> String {
        self.first_text()
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())
    }
}
