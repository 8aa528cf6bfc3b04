//! Webhook endpoint receiving Telegram updates over HTTP.
//!
//! Status codes: `200` once the update was handled (or deliberately
//! ignored), `400` when the body is not a Telegram update, `500` when the
//! reply could not be produced or delivered.

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Router};
use std::sync::Arc;
use teloxide::types::Update;
use tracing::{debug, error, warn};

use crate::bot::{decode_update, Transport, UpdateDispatcher};

pub struct WebhookState<T> {
    pub dispatcher: Arc<UpdateDispatcher>,
    pub transport: Arc<T>,
}

impl<T> Clone for WebhookState<T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            transport: Arc::clone(&self.transport),
        }
    }
}

/// Router serving `POST /<secret>`
pub fn build_router<T>(state: WebhookState<T>, secret: &str) -> Router
where
    T: Transport + 'static,
{
    Router::new()
        .route(&format!("/{secret}"), post(process_update::<T>))
        .with_state(state)
}

async fn process_update<T>(State(state): State<WebhookState<T>>, body: Bytes) -> StatusCode
where
    T: Transport + 'static,
{
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, "Rejecting undecodable update payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    let Some(inbound) = decode_update(&update) else {
        debug!("Update carries nothing to handle");
        return StatusCode::OK;
    };

    // Each update runs in its own task so a panicking delivery cannot take
    // the server down with it. Handler panics are already turned into the
    // apology by the dispatcher.
    let task = tokio::spawn(async move {
        let reply = state
            .dispatcher
            .dispatch(inbound.event, state.transport.as_ref())
            .await;
        match reply {
            Some(reply) => state.transport.deliver(inbound.chat_id, &reply).await,
            None => Ok(()),
        }
    });

    match task.await {
        Ok(Ok(())) => StatusCode::OK,
        Ok(Err(e)) => {
            error!(error = ?e, "Failed to deliver reply");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Err(e) => {
            error!(error = %e, "Update handler aborted");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
