//! An abstraction layer for the remote slang service.
//!
//! This crate establishes the protocol that the widgets use to talk to
//! the service which translates, chats and captions images. The widgets
//! don't care whether the service is reached over HTTP, faked in memory
//! or anything else, as long as it implements [`Service`].
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod image;
mod request;
mod response;
mod service;

pub use error::*;
pub use image::*;
pub use request::*;
pub use response::*;
pub use service::*;
