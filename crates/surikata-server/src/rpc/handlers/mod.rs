//! RPC handler modules and registration.

pub mod event;
pub mod question;
pub mod speaker;
pub mod system;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::rpc::errors::RpcError;
use crate::rpc::registry::MethodRegistry;

/// Register all RPC handlers with the registry.
pub fn register_all(registry: &mut MethodRegistry) {
    // System
    registry.register("system.ping", system::PingHandler);
    registry.register("system.getInfo", system::GetInfoHandler);

    // Question
    registry.register("question.post", question::PostQuestionHandler);
    registry.register("question.vote", question::VoteQuestionHandler);
    registry.register("question.list", question::ListQuestionsHandler);

    // Event
    registry.register("event.get", event::GetEventHandler);
    registry.register("event.create", event::CreateEventHandler);
    registry.register("event.update", event::UpdateEventHandler);
    registry.register("event.delete", event::DeleteEventHandler);

    // Speaker
    registry.register("speaker.get", speaker::GetSpeakerHandler);
    registry.register("speaker.create", speaker::CreateSpeakerHandler);
    registry.register("speaker.update", speaker::UpdateSpeakerHandler);
}

/// Extract a required parameter from the params object.
pub(crate) fn require_param<'a>(params: Option<&'a Value>, key: &str) -> Result<&'a Value, RpcError> {
    params
        .and_then(|p| p.get(key))
        .ok_or_else(|| RpcError::InvalidParams {
            message: format!("Missing required parameter: {key}"),
        })
}

/// Extract a required string parameter.
pub(crate) fn require_string_param(params: Option<&Value>, key: &str) -> Result<String, RpcError> {
    require_param(params, key)?
        .as_str()
        .map(ToOwned::to_owned)
        .ok_or_else(|| RpcError::InvalidParams {
            message: format!("Parameter '{key}' must be a string"),
        })
}

/// Deserialize a required parameter into a typed value.
pub(crate) fn parse_param<T: DeserializeOwned>(params: Option<&Value>, key: &str) -> Result<T, RpcError> {
    let raw = require_param(params, key)?;
    T::deserialize(raw).map_err(|e| RpcError::InvalidParams {
        message: format!("Invalid parameter '{key}': {e}"),
    })
}

/// Serialize a handler result.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, RpcError> {
    serde_json::to_value(value).map_err(|e| RpcError::Internal {
        message: e.to_string(),
    })
}
