//! Tool types for function calling

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::JsonValue;

/// A tool the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool kind; always `"function"` today.
    #[serde(rename = "type")]
    pub kind: String,
    pub function: Function,
}

impl Tool {
    /// Wrap a function definition as a tool.
    pub fn function(function: Function) -> Self {
        Self {
            kind: "function".to_string(),
            function,
        }
    }
}

/// Function definition for tool calling.
///
/// `parameters` is a JSON schema carried verbatim; it is never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub description: String,
    pub parameters: JsonValue,
}

impl Function {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: JsonValue,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool call made by the model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ToolCallFunction>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: BTreeMap<String, JsonValue>) -> Self {
        Self {
            function: Some(ToolCallFunction {
                name: name.into(),
                arguments,
            }),
        }
    }

    /// Name of the called function, if present.
    pub fn name(&self) -> Option<&str> {
        self.function.as_ref().map(|f| f.name.as_str())
    }
}

/// Function name and structured arguments of a tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: BTreeMap<String, JsonValue>,
}
