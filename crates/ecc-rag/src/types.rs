//! OpenAI wire types
//!
//! Request and response bodies for the Chat Completions, Responses, Files
//! and Vector Store endpoints. Only the fields the bot reads are modelled;
//! everything else in a response is ignored.
//!
//! Author: hephaex@gmail.com

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Chat Completions
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub logit_bias: HashMap<String, i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ResponseRequest {
    pub model: String,
    pub input: String,
    pub instructions: String,
    pub temperature: f32,
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

/// Tool descriptor attached to a Responses call
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    FileSearch {
        vector_store_ids: Vec<String>,
        max_num_results: u32,
    },
}

/// Body of a Responses API result
#[derive(Debug, Deserialize)]
pub struct ResponseObject {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// One entry of `response.output`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<ContentBlock>,
    },
    FileSearchCall {
        #[serde(default)]
        results: Option<Vec<FileSearchResult>>,
    },
    #[serde(other)]
    Other,
}

/// One content block of a message item
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    OutputText {
        text: String,
        #[serde(default)]
        annotations: Vec<Annotation>,
    },
    Refusal {
        refusal: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Annotation {
    FileCitation {
        #[serde(default)]
        file_id: Option<String>,
        #[serde(default)]
        filename: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct FileSearchResult {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub score: Option<f32>,
}

impl ResponseObject {
    /// Content blocks of the first message item
    pub fn first_message(&self) -> Option<&[ContentBlock]> {
        self.output.iter().find_map(|item| match item {
            OutputItem::Message { content } => Some(content.as_slice()),
            OutputItem::FileSearchCall { .. } | OutputItem::Other => None,
        })
    }

    /// Text of the first content block of the first message item.
    ///
    /// `None` when there is no message, the message is empty, its first
    /// block is not text, or the text is empty.
    pub fn output_text(&self) -> Option<&str> {
        match self.first_message()?.first()? {
            ContentBlock::OutputText { text, .. } if !text.is_empty() => Some(text.as_str()),
            ContentBlock::OutputText { .. } | ContentBlock::Refusal { .. } | ContentBlock::Other => {
                None
            }
        }
    }

    /// Total number of file search results returned with the response
    pub fn search_result_count(&self) -> usize {
        self.output
            .iter()
            .map(|item| match item {
                OutputItem::FileSearchCall { results } => results.as_ref().map_or(0, Vec::len),
                OutputItem::Message { .. } | OutputItem::Other => 0,
            })
            .sum()
    }

    /// File names cited by the first message, in order of appearance
    pub fn cited_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for block in self.first_message().unwrap_or_default() {
            if let ContentBlock::OutputText { annotations, .. } = block {
                for annotation in annotations {
                    if let Annotation::FileCitation {
                        filename: Some(name),
                        ..
                    } = annotation
                    {
                        if !files.contains(&name.as_str()) {
                            files.push(name.as_str());
                        }
                    }
                }
            }
        }
        files
    }
}

// ============================================================================
// Files and Vector Stores
// ============================================================================

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateVectorStoreRequest<'a> {
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct VectorStoreObject {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub file_counts: FileCounts,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileCounts {
    #[serde(default)]
    pub completed: u64,
}

#[derive(Debug, Serialize)]
pub struct AttachFileRequest<'a> {
    pub file_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct VectorStoreFileObject {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ResponseObject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_output_text_skips_tool_calls() {
        let response = parse(json!({
            "id": "resp_1",
            "output": [
                {
                    "type": "file_search_call",
                    "id": "fs_1",
                    "status": "completed",
                    "queries": ["lab hours"],
                    "results": [
                        {"file_id": "file-1", "filename": "hours.txt", "score": 0.91, "text": "..."}
                    ]
                },
                {
                    "type": "message",
                    "id": "msg_1",
                    "role": "assistant",
                    "content": [
                        {
                            "type": "output_text",
                            "text": "The ECC Lab is open Monday–Friday...",
                            "annotations": [
                                {"type": "file_citation", "index": 10, "file_id": "file-1", "filename": "hours.txt"}
                            ]
                        }
                    ]
                }
            ]
        }));

        assert_eq!(response.output_text(), Some("The ECC Lab is open Monday–Friday..."));
        assert_eq!(response.search_result_count(), 1);
        assert_eq!(response.cited_files(), vec!["hours.txt"]);
    }

    #[test]
    fn test_no_message_item() {
        let response = parse(json!({
            "output": [
                {"type": "file_search_call", "id": "fs_1", "status": "completed"},
                {"type": "reasoning", "id": "rs_1", "summary": []}
            ]
        }));

        assert!(response.first_message().is_none());
        assert!(response.output_text().is_none());
        assert_eq!(response.search_result_count(), 0);
    }

    #[test]
    fn test_first_message_wins() {
        let response = parse(json!({
            "output": [
                {"type": "message", "content": []},
                {"type": "message", "content": [{"type": "output_text", "text": "later"}]}
            ]
        }));

        assert!(response.output_text().is_none());
    }

    #[test]
    fn test_refusal_and_empty_text_are_not_answers() {
        let refusal = parse(json!({
            "output": [{"type": "message", "content": [{"type": "refusal", "refusal": "no"}]}]
        }));
        assert!(refusal.output_text().is_none());

        let empty = parse(json!({
            "output": [{"type": "message", "content": [{"type": "output_text", "text": ""}]}]
        }));
        assert!(empty.output_text().is_none());
    }

    #[test]
    fn test_file_search_tool_shape() {
        let tool = Tool::FileSearch {
            vector_store_ids: vec!["vs_abc".to_string()],
            max_num_results: 10,
        };
        assert_eq!(
            serde_json::to_value(&tool).unwrap(),
            json!({"type": "file_search", "vector_store_ids": ["vs_abc"], "max_num_results": 10})
        );
    }

    #[test]
    fn test_chat_request_omits_empty_bias() {
        let request = ChatCompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![ChatMessage::user("hi")],
            seed: None,
            temperature: 0.0,
            max_tokens: None,
            logit_bias: HashMap::new(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("logit_bias").is_none());
        assert!(value.get("seed").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
