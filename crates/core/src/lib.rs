//! Core logic of the widgets: chat, translator, captions and navigation,
//! plus the host that runs them against a service.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

pub mod caption;
pub mod chat;
mod host;
pub mod nav;
mod reducer;
mod service_client;
#[cfg(test)]
mod testing;
pub mod translator;

pub use host::{EffectFuture, Perform, Widget, WidgetGoneError};
pub use reducer::{Generation, Reducer};
pub use service_client::{Failure, ServiceClient};
