use chrono::Utc;
use tokio::sync::{mpsc, watch};

use super::{Envelope, Perform};
use crate::service_client::ServiceClient;

#[inline]
pub async fn run_widget<R: Perform>(
    mut state: R,
    client: ServiceClient,
    event_tx: mpsc::WeakUnboundedSender<Envelope<R::Event>>,
    mut event_rx: mpsc::UnboundedReceiver<Envelope<R::Event>>,
    snapshot_tx: watch::Sender<R>,
) {
    debug!("started");
    while let Some(envelope) = event_rx.recv().await {
        let event = match envelope {
            Envelope::Event(event) => event,
            Envelope::Settle(tx) => {
                tx.send(()).ok();
                continue;
            }
        };
        trace!("received event: {event:?}");

        let (next_state, effect) = state.reduce(event, Utc::now());
        state = next_state;
        snapshot_tx.send_replace(state.clone());

        let Some(effect) = effect else {
            continue;
        };
        trace!("performing effect: {effect:?}");

        let fut = R::perform(effect, &client);
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let event = fut.await;
            // Only a weak sender is held here, so that an in-flight call
            // doesn't keep the widget alive after all handles are gone.
            let Some(event_tx) = event_tx.upgrade() else {
                debug!("widget has gone, discard the result");
                return;
            };
            event_tx.send(Envelope::Event(event)).ok();
        });
    }
    debug!("will terminate");
}
