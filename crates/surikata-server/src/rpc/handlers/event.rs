//! Event handlers: get, create, update, delete.
//!
//! Create and update pass through `validate_event` first; a rejected event
//! is never written.

use async_trait::async_trait;
use serde_json::{Value, json};
use surikata_core::event::Event;
use surikata_core::ids::{EventId, EventToken};
use surikata_core::validator::validate_event;
use tracing::{info, instrument, warn};

use super::{parse_param, require_string_param, to_json};
use crate::rpc::context::RpcContext;
use crate::rpc::errors::RpcError;
use crate::rpc::registry::MethodHandler;

fn validated_event(params: Option<&Value>) -> Result<Event, RpcError> {
    let event: Event = parse_param(params, "event")?;
    if let Err(err) = validate_event(&event) {
        warn!(kind = err.kind(), error = %err, "event rejected");
        return Err(err.into());
    }
    Ok(event)
}

/// Fetch an event by token together with its speaker profiles.
pub struct GetEventHandler;

#[async_trait]
impl MethodHandler for GetEventHandler {
    #[instrument(skip(self, ctx), fields(method = "event.get"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let token = EventToken::from(require_string_param(params.as_ref(), "eventToken")?);
        let event = ctx.store.event_by_token(&token).await?;
        let speakers = ctx.store.speakers_by_id(&event.speakers).await?;
        Ok(json!({
            "event": to_json(&event)?,
            "speakers": to_json(&speakers)?,
        }))
    }
}

/// Validate and store a new event.
pub struct CreateEventHandler;

#[async_trait]
impl MethodHandler for CreateEventHandler {
    #[instrument(skip(self, ctx), fields(method = "event.create"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let event = validated_event(params.as_ref())?;
        let stored = ctx.store.insert_event(event).await?;
        info!(event_id = %stored.id, event_token = %stored.event_token, "event created");
        to_json(&stored)
    }
}

/// Validate and replace an existing event.
pub struct UpdateEventHandler;

#[async_trait]
impl MethodHandler for UpdateEventHandler {
    #[instrument(skip(self, ctx), fields(method = "event.update"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let event = validated_event(params.as_ref())?;
        if event.id.is_empty() {
            return Err(RpcError::InvalidParams {
                message: "event.id is required for update".into(),
            });
        }
        let stored = ctx.store.update_event(event).await?;
        info!(event_id = %stored.id, "event updated");
        to_json(&stored)
    }
}

/// Remove an event.
pub struct DeleteEventHandler;

#[async_trait]
impl MethodHandler for DeleteEventHandler {
    #[instrument(skip(self, ctx), fields(method = "event.delete"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let id = EventId::from(require_string_param(params.as_ref(), "eventId")?);
        ctx.store.delete_event(&id).await?;
        info!(event_id = %id, "event deleted");
        Ok(json!({ "deleted": true }))
    }
}
