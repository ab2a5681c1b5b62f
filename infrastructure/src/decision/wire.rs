//! OpenAI-compatible chat-completions wire types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use switchyard_application::{Decision, DecisionError, DecisionRequest};
use switchyard_domain::Arguments;

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FunctionTool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionSpec,
}

#[derive(Debug, Serialize)]
pub(crate) struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: WireFunctionCall,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded object; some backends send the object itself
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChatMessage,
}

/// Build the request body for one decision.
///
/// Scratchpad entries are replayed as assistant tool calls followed by the
/// matching tool messages.
pub(crate) fn build_request(request: &DecisionRequest) -> ChatCompletionRequest {
    let mut messages = vec![
        ChatMessage::text("system", &request.system_prompt),
        ChatMessage::text("user", &request.user_input),
    ];

    for (index, entry) in request.scratchpad.iter().enumerate() {
        let call_id = format!("call_{}", index);
        messages.push(ChatMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: vec![WireToolCall {
                id: call_id.clone(),
                kind: function_kind(),
                function: WireFunctionCall {
                    name: entry.tool_name.clone(),
                    arguments: Value::String(Value::Object(entry.arguments.clone()).to_string()),
                },
            }],
            tool_call_id: None,
        });
        messages.push(ChatMessage {
            role: "tool".to_string(),
            content: Some(entry.observation.clone()),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id),
        });
    }

    ChatCompletionRequest {
        model: request.generation.model_name.clone(),
        temperature: request.generation.temperature,
        messages,
        tools: request
            .tools
            .iter()
            .map(|entry| FunctionTool {
                kind: "function",
                function: FunctionSpec {
                    name: entry.name.clone(),
                    description: entry.description.clone(),
                    parameters: entry.parameters.clone(),
                },
            })
            .collect(),
    }
}

/// Interpret the first choice: a tool call wins over text.
pub(crate) fn parse_decision(response: ChatCompletionResponse) -> Result<Decision, DecisionError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| DecisionError::InvalidResponse("response has no choices".to_string()))?;

    if let Some(call) = message.tool_calls.into_iter().next() {
        let arguments = parse_arguments(&call.function.name, call.function.arguments)?;
        return Ok(Decision::ToolCall {
            name: call.function.name,
            arguments,
        });
    }

    Ok(Decision::Text(message.content.unwrap_or_default()))
}

fn parse_arguments(tool: &str, raw: Value) -> Result<Arguments, DecisionError> {
    let value = match raw {
        Value::String(s) if s.trim().is_empty() => return Ok(Arguments::new()),
        Value::String(s) => serde_json::from_str(&s).map_err(|e| {
            DecisionError::InvalidResponse(format!("arguments for '{}' are not JSON: {}", tool, e))
        })?,
        Value::Null => return Ok(Arguments::new()),
        other => other,
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecisionError::InvalidResponse(format!(
            "arguments for '{}' must be an object, got {}",
            tool, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchyard_application::{ScratchpadEntry, ToolManifestEntry};
    use switchyard_domain::{GenerationParams, ParameterSchema};

    fn response(message: Value) -> ChatCompletionResponse {
        serde_json::from_value(json!({"choices": [{"message": message}]})).unwrap()
    }

    #[test]
    fn test_build_request_replays_scratchpad() {
        let mut request = DecisionRequest::new(
            "You are a coordinator",
            "Chính sách nghỉ phép",
            GenerationParams::new("gemini-2.0-flash", 0.0),
        )
        .with_tools(vec![ToolManifestEntry::new(
            "HR_Agent",
            "HR policies",
            &ParameterSchema::single_string("input_query", "Request"),
        )]);
        let mut arguments = Arguments::new();
        arguments.insert("input_query".into(), json!("nghỉ phép"));
        request.scratchpad.push(ScratchpadEntry {
            tool_name: "HR_Agent".into(),
            arguments,
            observation: "12 ngày".into(),
        });

        let body = serde_json::to_value(build_request(&request)).unwrap();
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[2]["tool_calls"][0]["function"]["name"], "HR_Agent");
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_0");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "HR_Agent");
    }

    #[test]
    fn test_request_without_tools_omits_field() {
        let request = DecisionRequest::new("sys", "hi", GenerationParams::default());
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_parse_text() {
        let decision = parse_decision(response(json!({"role": "assistant", "content": "Xin chào"})));
        assert_eq!(decision.unwrap(), Decision::Text("Xin chào".into()));
    }

    #[test]
    fn test_parse_tool_call_with_string_arguments() {
        let decision = parse_decision(response(json!({
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "abc",
                "type": "function",
                "function": {"name": "web_search", "arguments": "{\"query\": \"rust\"}"}
            }]
        })))
        .unwrap();
        match decision {
            Decision::ToolCall { name, arguments } => {
                assert_eq!(name, "web_search");
                assert_eq!(arguments.get("query"), Some(&json!("rust")));
            }
            other => panic!("unexpected decision: {other:?}"),
        }
    }

    #[test]
    fn test_parse_tool_call_with_object_arguments() {
        let decision = parse_decision(response(json!({
            "role": "assistant",
            "tool_calls": [{"function": {"name": "current_time", "arguments": {}}}]
        })))
        .unwrap();
        assert!(matches!(decision, Decision::ToolCall { ref name, .. } if name == "current_time"));
    }

    #[test]
    fn test_parse_rejects_bad_arguments_and_empty_choices() {
        let bad = parse_decision(response(json!({
            "role": "assistant",
            "tool_calls": [{"function": {"name": "x", "arguments": "[1, 2]"}}]
        })));
        assert!(matches!(bad, Err(DecisionError::InvalidResponse(_))));

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(parse_decision(empty), Err(DecisionError::InvalidResponse(_))));
    }
}
