//! Anthropic Messages body for Bedrock `InvokeModel`
//!
//! Only the fields this service sends and reads are modeled; unknown response
//! fields (`id`, `usage`, `stop_reason`, ...) are ignored.

use serde::{Deserialize, Serialize};

/// API version Bedrock expects in Anthropic request bodies
pub const ANTHROPIC_BEDROCK_VERSION: &str = "bedrock-2023-05-31";

/// Text returned when a successful response carries no usable text
pub const NO_RESPONSE_TEXT: &str = "No response generated";

/// Single-turn message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Request body sent through `InvokeModel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnthropicRequest {
    pub anthropic_version: String,
    pub max_tokens: i32,
    pub messages: Vec<AnthropicMessage>,
}

impl AnthropicRequest {
    /// Build a single user-turn request
    pub fn user(query: impl Into<String>, max_tokens: i32) -> Self {
        Self {
            anthropic_version: ANTHROPIC_BEDROCK_VERSION.to_string(),
            max_tokens,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: query.into(),
            }],
        }
    }
}

/// One entry of the response `content` list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnthropicContentBlock {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Response body returned by `InvokeModel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub content: Option<Vec<AnthropicContentBlock>>,
}

impl AnthropicResponse {
    /// Text of the first content block, if present
    pub fn first_text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .and_then(|blocks| blocks.first())
            .and_then(|block| block.text.as_deref())
    }

    /// First text, or [`NO_RESPONSE_TEXT`] when there is none
    pub fn into_text(self) -> String {
        self.first_text()
            .map(str::to_string)
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())
    }
}
