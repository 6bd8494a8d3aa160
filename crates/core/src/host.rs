//! Runs reducers as independent widgets on the tokio runtime.

mod scheduler;

use std::error::Error;
use std::fmt;
use std::pin::Pin;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::Instrument;

use crate::reducer::Reducer;
use crate::service_client::ServiceClient;
use scheduler::run_widget;

/// A boxed future that resolves to the event reporting an effect's result.
pub type EffectFuture<E> = Pin<Box<dyn Future<Output = E> + Send>>;

/// A reducer whose effects can be carried out with a [`ServiceClient`].
pub trait Perform: Reducer {
    /// Executes `effect`, returning a future that resolves to the event
    /// which feeds the result back into the state.
    ///
    /// The future must be fully independent of the state, since it runs
    /// while the state keeps processing other events.
    fn perform(
        effect: Self::Effect,
        client: &ServiceClient,
    ) -> EffectFuture<Self::Event>;
}

/// An error which is returned when events are dispatched to a widget whose
/// task has terminated.
pub struct WidgetGoneError;

impl fmt::Debug for WidgetGoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetGoneError").finish()
    }
}

impl fmt::Display for WidgetGoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "the widget has gone".fmt(f)
    }
}

impl Error for WidgetGoneError {}

/// What travels through the widget's mailbox.
pub(crate) enum Envelope<E> {
    Event(E),
    Settle(oneshot::Sender<()>),
}

/// Handle to a running widget.
///
/// A widget owns its state in a dedicated task. Events are applied one at
/// a time in the order they are dispatched, and every new state is
/// published as a snapshot. The task terminates once all handles to the
/// widget are dropped; results of calls still in flight are discarded.
pub struct Widget<R: Perform> {
    event_tx: mpsc::UnboundedSender<Envelope<R::Event>>,
    snapshot_rx: watch::Receiver<R>,
}

impl<R: Perform> Widget<R> {
    /// Spawns a new widget with the initial state and a label used in
    /// logs. Must be called from within a tokio runtime.
    pub fn spawn(state: R, client: ServiceClient, label: &str) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.clone());
        tokio::spawn(
            run_widget(
                state,
                client,
                event_tx.downgrade(),
                event_rx,
                snapshot_tx,
            )
            .instrument(trace_span!("widget", label = label)),
        );
        Self {
            event_tx,
            snapshot_rx,
        }
    }

    /// Dispatches an event to the widget.
    #[inline]
    pub fn dispatch(&self, event: R::Event) -> Result<(), WidgetGoneError> {
        self.event_tx
            .send(Envelope::Event(event))
            .map_err(|_| WidgetGoneError)
    }

    /// Waits until every event dispatched so far has been applied, and
    /// returns the resulting state.
    ///
    /// Calls started by those events may still be outstanding.
    pub async fn settled(&self) -> Result<R, WidgetGoneError> {
        let (tx, rx) = oneshot::channel();
        self.event_tx
            .send(Envelope::Settle(tx))
            .map_err(|_| WidgetGoneError)?;
        rx.await.map_err(|_| WidgetGoneError)?;
        Ok(self.snapshot())
    }

    /// Returns the latest published state.
    #[inline]
    pub fn snapshot(&self) -> R {
        self.snapshot_rx.borrow().clone()
    }

    /// Returns a receiver that is notified whenever the state changes.
    #[inline]
    pub fn subscribe(&self) -> watch::Receiver<R> {
        self.snapshot_rx.clone()
    }

    /// Waits until the published state satisfies `f` and returns it.
    ///
    /// If the widget terminates first, the last published state is
    /// returned as is.
    pub async fn wait_for(&self, mut f: impl FnMut(&R) -> bool) -> R {
        let mut rx = self.snapshot_rx.clone();
        let result = rx.wait_for(|state| f(state)).await.map(|s| s.clone());
        match result {
            Ok(state) => state,
            Err(_) => rx.borrow().clone(),
        }
    }
}

impl<R: Perform> Clone for Widget<R> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            event_tx: self.event_tx.clone(),
            snapshot_rx: self.snapshot_rx.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use genbridge_test_service::{PresetReply, TestService};

    use super::*;
    use crate::chat::{ChatEvent, ChatPhase, ChatState};

    #[tokio::test]
    async fn test_settled() {
        let service = TestService::default();
        service.add_chat_reply(PresetReply::text("bet"));
        let client = ServiceClient::new(service);

        let widget = Widget::spawn(ChatState::new(), client, "chat");
        widget
            .dispatch(ChatEvent::InputChanged("hello".to_owned()))
            .unwrap();
        let state = widget.settled().await.unwrap();
        assert_eq!(state.input(), "hello");

        widget.dispatch(ChatEvent::Submit).unwrap();
        let state = widget.settled().await.unwrap();
        assert_eq!(state.user_turns(), 1);
        assert_eq!(state.messages()[0].text(), "hello");

        let state = widget.wait_for(|s| s.phase() == ChatPhase::Idle).await;
        assert_eq!(state.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_the_widget() {
        let client = ServiceClient::new(TestService::default());
        let widget = Widget::spawn(ChatState::new(), client, "chat");
        let other = widget.clone();

        other
            .dispatch(ChatEvent::InputChanged("yo".to_owned()))
            .unwrap();
        drop(other);
        let state = widget.settled().await.unwrap();
        assert_eq!(state.input(), "yo");
        assert_eq!(widget.subscribe().borrow().input(), "yo");
    }
}
