//! Question handlers: post, vote, list.
//!
//! Successful writes trigger exactly one publish for the affected scope.
//! Publish failures are logged by the notifier and never fail the write.
//! The publish runs on its own task, so a handler timeout after the write
//! cannot cancel it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use surikata_core::ids::QuestionId;
use surikata_core::question::{Question, VoteDirection};
use surikata_core::scope::Scope;
use tracing::{info, instrument, warn};

use super::{parse_param, require_string_param, to_json};
use crate::rpc::context::RpcContext;
use crate::rpc::errors::RpcError;
use crate::rpc::registry::MethodHandler;
use crate::websocket::notifier::PublishSummary;

fn scope_param(params: Option<&Value>) -> Result<Scope, RpcError> {
    let event_token = require_string_param(params, "eventToken")?;
    let session_token = require_string_param(params, "sessionToken")?;
    if event_token.is_empty() || session_token.is_empty() {
        return Err(RpcError::InvalidParams {
            message: "eventToken and sessionToken must not be empty".into(),
        });
    }
    Ok(Scope::new(event_token, session_token))
}

/// Publish `scope` on a detached task and wait for its summary.
async fn publish_detached(ctx: &RpcContext, scope: Scope) -> Option<PublishSummary> {
    let notifier = Arc::clone(&ctx.notifier);
    match tokio::spawn(async move { notifier.publish(&scope).await }).await {
        Ok(summary) => summary,
        Err(error) => {
            warn!(%error, "publish task failed");
            None
        }
    }
}

/// Post a new question into an event session.
pub struct PostQuestionHandler;

#[async_trait]
impl MethodHandler for PostQuestionHandler {
    #[instrument(skip(self, ctx), fields(method = "question.post"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let scope = scope_param(params.as_ref())?;
        let text = require_string_param(params.as_ref(), "question")?;
        if text.trim().is_empty() {
            return Err(RpcError::InvalidParams {
                message: "question must not be empty".into(),
            });
        }

        let _ = ctx.store.event_by_token(&scope.event_token).await?;
        let question = ctx.store.insert_question(Question::new(&scope, text)).await?;
        info!(%scope, question_id = %question.id, "question posted");

        let summary = publish_detached(ctx, scope).await;
        Ok(json!({
            "question": to_json(&question)?,
            "notified": summary.map_or(0, |s| s.delivered),
        }))
    }
}

/// Up- or down-vote a question.
pub struct VoteQuestionHandler;

#[async_trait]
impl MethodHandler for VoteQuestionHandler {
    #[instrument(skip(self, ctx), fields(method = "question.vote"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let id = QuestionId::from(require_string_param(params.as_ref(), "questionId")?);
        let direction: VoteDirection = parse_param(params.as_ref(), "direction")?;

        let question = ctx.store.vote_question(&id, direction.delta()).await?;
        info!(question_id = %id, vote = question.vote, "question voted");

        let summary = publish_detached(ctx, question.scope()).await;
        Ok(json!({
            "question": to_json(&question)?,
            "notified": summary.map_or(0, |s| s.delivered),
        }))
    }
}

/// Current question list of a scope.
pub struct ListQuestionsHandler;

#[async_trait]
impl MethodHandler for ListQuestionsHandler {
    #[instrument(skip(self, ctx), fields(method = "question.list"))]
    async fn handle(&self, params: Option<Value>, ctx: &RpcContext) -> Result<Value, RpcError> {
        let scope = scope_param(params.as_ref())?;
        let questions = ctx.store.questions_by_scope(&scope).await?;
        Ok(json!({ "questions": to_json(&questions)? }))
    }
}
