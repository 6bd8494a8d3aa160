//! A page of small widgets that bridge the generation gap: a slang
//! translator, a chat buddy and an image captioner.
//!
//! The crate includes a CLI tool for using in the terminal. And you can also
//! use it as a library to host the widgets in your own front end.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod image;
mod page;

pub use config::{
    BASE_URL_VAR, CAPTION_PATH_VAR, CHAT_TURN_LIMIT_VAR, Config, ConfigError,
    TIMEOUT_SECS_VAR,
};
pub use image::{LoadImageError, image_mime, load_image};
pub use page::{Page, PageBuilder, PageSnapshot};

/// Re-exports of [`genbridge_core`] crate.
pub mod core {
    pub use genbridge_core::*;
}
