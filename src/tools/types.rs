//! Shared types for the tool system.
//!
//! A `ToolDescriptor` fully determines validation: each parameter declares
//! its type, whether it is required, and an optional default. Coercion
//! rules are explicit per type (a declared integer accepts a numeric
//! string, a declared boolean accepts "true"/"false") so nothing relies on
//! implicit dynamic conversion at the boundary.

use serde::Serialize;
use serde_json::Value;

use crate::client::ApiError;

/// Wire-level type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    /// JSON Schema type name.
    pub fn schema_name(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }

    /// Check a value against this type, applying the declared coercions.
    ///
    /// Returns the (possibly coerced) value, or `None` when the value is
    /// not acceptable.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (ParamType::String, Value::String(_)) => Some(value.clone()),
            (ParamType::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {
                Some(value.clone())
            }
            (ParamType::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().ok().map(Value::from)
            }
            (ParamType::Boolean, Value::Bool(_)) => Some(value.clone()),
            (ParamType::Boolean, Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            (ParamType::Object, Value::Object(_)) => Some(value.clone()),
            (ParamType::Array, Value::Array(_)) => Some(value.clone()),
            _ => None,
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub param_type: ParamType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    pub fn required(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            param_type,
            required: true,
            default: None,
            description,
        }
    }

    pub fn optional(name: &'static str, param_type: ParamType, description: &'static str) -> Self {
        Self {
            name,
            param_type,
            required: false,
            default: None,
            description,
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declares a callable tool: unique name, description, ordered parameters.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolDescriptor {
    /// Render the parameter list as a JSON Schema object for `tools/list`.
    pub fn input_schema(&self) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for param in &self.params {
            let mut prop = serde_json::Map::new();
            prop.insert("type".to_string(), param.param_type.schema_name().into());
            prop.insert("description".to_string(), param.description.into());
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(param.name.to_string(), Value::Object(prop));
            if param.required {
                required.push(Value::from(param.name));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Errors a tool handler can produce after validation has passed.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments passed schema validation but fail a cross-field rule.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    /// The underlying resource client call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The uniform envelope every dispatch produces.
///
/// Exactly one variant is ever returned; dispatch never propagates an
/// error past this type.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvocationResult {
    Success { payload: Value },
    UnknownTool { message: String },
    InvalidParameters { message: String },
    UpstreamError { status: u16, message: String },
    TransportError { message: String },
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success { .. })
    }

    /// Fold a handler outcome into the envelope.
    pub fn from_handler(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(payload) => InvocationResult::Success { payload },
            Err(ToolError::InvalidParameters(message)) => {
                InvocationResult::InvalidParameters { message }
            }
            Err(ToolError::Api(ApiError::Upstream { status, message })) => {
                InvocationResult::UpstreamError { status, message }
            }
            Err(ToolError::Api(ApiError::Transport(message))) => {
                InvocationResult::TransportError { message }
            }
            Err(ToolError::Api(ApiError::InvalidResponse { status, message })) => {
                InvocationResult::UpstreamError { status, message }
            }
            Err(ToolError::Api(ApiError::InvalidRequest(message))) => {
                InvocationResult::InvalidParameters { message }
            }
        }
    }
}

/// A registered tool: a descriptor plus an async handler bound to a
/// resource client. Handlers receive arguments that already passed schema
/// validation, with defaults filled in.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> ToolDescriptor;

    async fn invoke(&self, args: Value) -> Result<Value, ToolError>;
}
