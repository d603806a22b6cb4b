//! Purchase-confirmation push dispatch.
//!
//! Runs as a detached task off the chat path. Every failure mode here is
//! logged and swallowed: the chat request that triggered the dispatch
//! never observes its outcome.

use crate::services::database::UserStore;
use crate::services::metrics;
use crate::services::providers::{PushMessage, PushProvider};
use std::sync::Arc;

const PUSH_TITLE: &str = "Nueva compra confirmada";
const PUSH_BODY: &str = "Un cliente confirmó una compra. Revisalo en tu panel.";

/// Sends the fixed purchase-confirmation push for `uid`, if the user has
/// a registered token and a privileged plan. Ineligible users are a
/// silent no-op.
pub async fn notify_purchase_confirmed(
    users: Arc<dyn UserStore>,
    push: Arc<dyn PushProvider>,
    uid: &str,
) {
    let record = match users.find_user(uid).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::warn!(uid = %uid, "Purchase push skipped: user not found");
            return;
        }
        Err(e) => {
            tracing::error!(uid = %uid, error = %e, "Purchase push skipped: user lookup failed");
            return;
        }
    };

    let Some(token) = record.push_token.clone() else {
        tracing::warn!(uid = %uid, "Purchase push skipped: user has no push token");
        return;
    };

    if !record.has_privileged_plan() {
        tracing::info!(uid = %uid, plan = %record.plan, "Purchase push skipped: plan not eligible");
        return;
    }

    let message = PushMessage {
        device_token: token,
        title: PUSH_TITLE.to_string(),
        body: PUSH_BODY.to_string(),
    };

    match push.send(&message).await {
        Ok(response) => {
            metrics::record_provider_call("fcm", "sent");
            tracing::info!(
                uid = %uid,
                provider_id = ?response.provider_id,
                "Purchase push sent"
            );
        }
        Err(e) => {
            metrics::record_provider_call("fcm", "failed");
            tracing::error!(uid = %uid, error = %e, "Failed to send purchase push");
        }
    }
}
