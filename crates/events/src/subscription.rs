//! Callback delivery for store subscriptions.

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use typeboard_core::store::{OnChange, Subscription};

use crate::bus::RosterChange;

/// Spawn a task that invokes `on_change` once per change received on
/// `receiver`, until the returned [`Subscription`] is cancelled or the bus
/// is dropped.
///
/// A lagged receiver has lost an unknown number of changes; the callback
/// fires once for the whole gap since it carries no payload anyway.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_subscription(
    mut receiver: broadcast::Receiver<RosterChange>,
    on_change: OnChange,
) -> Subscription {
    let token = CancellationToken::new();
    let task_token = token.clone();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                () = task_token.cancelled() => {
                    tracing::debug!("Roster subscription cancelled");
                    break;
                }
                result = receiver.recv() => match result {
                    Ok(change) => {
                        if task_token.is_cancelled() {
                            break;
                        }
                        tracing::trace!(op = ?change.op, player_id = ?change.player_id, "Roster change");
                        on_change();
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Roster subscription lagged");
                        if task_token.is_cancelled() {
                            break;
                        }
                        on_change();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Change bus closed, roster subscription ending");
                        break;
                    }
                }
            }
        }
    });

    Subscription::new(token)
}
