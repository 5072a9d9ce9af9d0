//! Built-in tools.

use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("integer overflow")]
    Overflow,
}

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct AddArgs {
    a: i64,
    b: i64,
}

/// Descriptors for `tools/list`.
pub fn list() -> Value {
    json!([{
        "name": "add",
        "description": "Add two integers.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "a": { "type": "integer" },
                "b": { "type": "integer" }
            },
            "required": ["a", "b"]
        }
    }])
}

/// Run a `tools/call` request and build its result.
pub fn call(params: Value) -> Result<Value, ToolError> {
    let params: CallParams = serde_json::from_value(params)?;

    match params.name.as_str() {
        "add" => {
            let args: AddArgs = serde_json::from_value(params.arguments)?;
            let sum = args.a.checked_add(args.b).ok_or(ToolError::Overflow)?;
            Ok(json!({
                "content": [{ "type": "text", "text": sum.to_string() }],
                "structuredContent": { "result": sum },
                "isError": false
            }))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
