//! Pushes the current question list of a scope to its live viewers.
//!
//! Every push fetches fresh state from the [`QuestionSource`]; nothing is
//! cached. A payload is encoded once per notification and the same
//! `Arc<String>` is queued to every viewer.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use surikata_core::ids::{ConnectionId, EventToken, SessionToken};
use surikata_core::question::Question;
use surikata_core::scope::Scope;
use surikata_store::{QuestionSource, StoreError};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::connection::{SendError, ViewerConnection};
use super::registry::ConnectionRegistry;
use crate::metrics::{
    NOTIFY_DELIVERIES_TOTAL, NOTIFY_DELIVERY_FAILURES_TOTAL, NOTIFY_FETCH_ERRORS_TOTAL, NOTIFY_TOTAL,
};

/// Event type of the pushed payload.
pub const QUESTIONS_UPDATED: &str = "questions.updated";

/// Errors that abort a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The question fetch failed; nothing was sent.
    #[error("failed to fetch questions: {0}")]
    Fetch(#[from] StoreError),
    /// The payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    /// A single-connection push could not be queued.
    #[error("failed to deliver to {connection_id}: {error}")]
    Delivery {
        /// Target connection.
        connection_id: ConnectionId,
        /// Underlying send failure.
        error: SendError,
    },
}

/// One viewer that did not receive a fan-out payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// Connection the payload was meant for.
    pub connection_id: ConnectionId,
    /// Why it was not queued.
    pub error: SendError,
}

/// Outcome of one [`Notifier::notify_scope`] fan-out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScopeDelivery {
    /// Viewers the payload was queued to.
    pub delivered: usize,
    /// Viewers that could not be reached. Empty means every viewer got it.
    pub failures: Vec<DeliveryFailure>,
}

/// Outcome of [`Notifier::publish`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PublishSummary {
    /// Viewers the payload was queued to.
    pub delivered: usize,
    /// Viewers that failed and were unregistered.
    pub pruned: usize,
}

/// Wire envelope for a question list push.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionsUpdated<'a> {
    #[serde(rename = "type")]
    event_type: &'static str,
    event_token: &'a EventToken,
    session_token: &'a SessionToken,
    timestamp: String,
    data: &'a [Question],
}

/// Encode the push payload for `scope`.
pub fn encode_questions(scope: &Scope, questions: &[Question]) -> Result<Arc<String>, serde_json::Error> {
    let envelope = QuestionsUpdated {
        event_type: QUESTIONS_UPDATED,
        event_token: &scope.event_token,
        session_token: &scope.session_token,
        timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        data: questions,
    };
    serde_json::to_string(&envelope).map(Arc::new)
}

/// Fan-out of question lists to registered viewers.
pub struct Notifier {
    source: Arc<dyn QuestionSource>,
    registry: Arc<ConnectionRegistry>,
}

impl Notifier {
    /// Create a notifier over a data source and a registry.
    pub fn new(source: Arc<dyn QuestionSource>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { source, registry }
    }

    /// The registry this notifier delivers through.
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Push the current question list of `scope` to every registered viewer.
    ///
    /// A fetch failure returns early with nothing sent. Otherwise every
    /// viewer in one registry snapshot is attempted and each failed send is
    /// reported. Failed viewers are left registered.
    #[instrument(skip(self), fields(scope = %scope))]
    pub async fn notify_scope(&self, scope: &Scope) -> Result<ScopeDelivery, NotifyError> {
        counter!(NOTIFY_TOTAL).increment(1);
        let questions = self.fetch(scope).await?;

        let viewers = self.registry.connections_for(scope);
        if viewers.is_empty() {
            debug!("no viewers registered");
            return Ok(ScopeDelivery::default());
        }

        let payload = encode_questions(scope, &questions)?;
        let mut failures = Vec::new();
        for viewer in &viewers {
            if let Err(error) = viewer.send(Arc::clone(&payload)) {
                counter!(NOTIFY_DELIVERY_FAILURES_TOTAL, "reason" => error.as_label()).increment(1);
                failures.push(DeliveryFailure {
                    connection_id: viewer.id.clone(),
                    error,
                });
            }
        }

        let delivered = viewers.len() - failures.len();
        counter!(NOTIFY_DELIVERIES_TOTAL).increment(delivered as u64);
        debug!(
            questions = questions.len(),
            delivered,
            failed = failures.len(),
            "scope notified"
        );
        Ok(ScopeDelivery { delivered, failures })
    }

    /// Push the current question list of `scope` to one connection only.
    pub async fn notify_connection(
        &self,
        scope: &Scope,
        connection: &ViewerConnection,
    ) -> Result<(), NotifyError> {
        let questions = self.fetch(scope).await?;
        let payload = encode_questions(scope, &questions)?;
        connection.send(payload).map_err(|error| NotifyError::Delivery {
            connection_id: connection.id.clone(),
            error,
        })?;
        counter!(NOTIFY_DELIVERIES_TOTAL).increment(1);
        Ok(())
    }

    /// Register for updates, then send the initial snapshot.
    ///
    /// Registration comes first so a write landing during the snapshot fetch
    /// still fans out to this viewer. If the initial push fails the
    /// connection is unregistered again before the error is returned.
    pub async fn on_viewer_connected(
        &self,
        scope: &Scope,
        connection: Arc<ViewerConnection>,
    ) -> Result<(), NotifyError> {
        self.registry.register(scope, Arc::clone(&connection));
        if let Err(error) = self.notify_connection(scope, &connection).await {
            let _ = self.registry.unregister(scope, &connection.id);
            return Err(error);
        }
        Ok(())
    }

    /// Remove a closed viewer from its scope.
    pub fn on_viewer_disconnected(&self, scope: &Scope, connection_id: &ConnectionId) -> bool {
        self.registry.unregister(scope, connection_id)
    }

    /// Notify `scope` after a write and prune viewers that failed.
    ///
    /// Never fails the triggering write: errors are logged and `None` is
    /// returned when the fetch itself failed.
    pub async fn publish(&self, scope: &Scope) -> Option<PublishSummary> {
        match self.notify_scope(scope).await {
            Ok(ScopeDelivery { delivered, failures }) => {
                for failure in &failures {
                    warn!(
                        %scope,
                        connection_id = %failure.connection_id,
                        error = %failure.error,
                        "viewer unreachable, unregistering"
                    );
                    let _ = self.registry.unregister(scope, &failure.connection_id);
                }
                let summary = PublishSummary {
                    delivered,
                    pruned: failures.len(),
                };
                info!(%scope, delivered = summary.delivered, pruned = summary.pruned, "published");
                Some(summary)
            }
            Err(error) => {
                warn!(%scope, %error, "publish failed");
                None
            }
        }
    }

    async fn fetch(&self, scope: &Scope) -> Result<Vec<Question>, NotifyError> {
        self.source.questions_by_scope(scope).await.map_err(|e| {
            counter!(NOTIFY_FETCH_ERRORS_TOTAL).increment(1);
            NotifyError::Fetch(e)
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
