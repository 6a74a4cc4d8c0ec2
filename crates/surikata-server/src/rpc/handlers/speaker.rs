//! Speaker handlers: get, create, update.

use async_trait::async_trait;
use serde_json::Value;
use surikata_core::event::Speaker;
use surikata_core::ids::SpeakerId;
use tracing::{info, instrument};

use super::{parse_param, require_string_param, to_json};
use crate::rpc::context::RpcContext;
use crate::rpc::errors::RpcError;
use crate::rpc::registry::MethodHandler;

/// Fetch one speaker profile.
pub struct GetSpeakerHandler;

#[async_trait]
impl MethodHandler for GetSpeakerHandler {
    #[instrument(skip(self, ctx), fields(method = "speaker.get"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let id = SpeakerId::from(require_string_param(params.as_ref(), "speakerId")?);
        to_json(&ctx.store.speaker_by_id(&id).await?)
    }
}

/// Store a new speaker; the id is assigned by storage.
pub struct CreateSpeakerHandler;

#[async_trait]
impl MethodHandler for CreateSpeakerHandler {
    #[instrument(skip(self, ctx), fields(method = "speaker.create"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let speaker: Speaker = parse_param(params.as_ref(), "speaker")?;
        let stored = ctx.store.insert_speaker(speaker).await?;
        info!(speaker_id = %stored.id, "speaker created");
        to_json(&stored)
    }
}

/// Insert or replace a speaker by id.
pub struct UpdateSpeakerHandler;

#[async_trait]
impl MethodHandler for UpdateSpeakerHandler {
    #[instrument(skip(self, ctx), fields(method = "speaker.update"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let speaker: Speaker = parse_param(params.as_ref(), "speaker")?;
        let stored = ctx.store.update_speaker(speaker).await?;
        info!(speaker_id = %stored.id, "speaker updated");
        to_json(&stored)
    }
}
