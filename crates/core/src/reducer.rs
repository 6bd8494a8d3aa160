use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A widget state that evolves by applying events to it.
///
/// Reducing is a pure function: the next state and the effect to run
/// depend only on the current state, the event and the given instant.
/// Anything that talks to the outside world is described by the returned
/// effect and executed elsewhere.
pub trait Reducer: Clone + Send + Sync + 'static {
    /// Events that the state reacts to.
    type Event: Debug + Send + 'static;

    /// Side effects that the state asks for.
    type Effect: Debug + Send + 'static;

    /// Applies `event` at `now`, returning the next state and an optional
    /// effect.
    fn reduce(
        self,
        event: Self::Event,
        now: DateTime<Utc>,
    ) -> (Self, Option<Self::Effect>);
}

/// A counter that identifies the session an outbound call belongs to.
///
/// States bump their generation whenever they are reset, and every effect
/// carries the generation that issued it. A result with an older
/// generation arrives after a reset and must be discarded.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
)]
pub struct Generation(u64);

impl Generation {
    /// Returns the generation that follows this one.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
