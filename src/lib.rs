//! Cinema Library
//!
//! Server-rendered web application skeleton:
//! - Example REST resource over an in-memory user collection
//! - HTML document shell and generic error page rendering
//! - Lazy locale data, polyfill and translation catalog loading
//! - Line-delimited JSON request server hosting all of the above

pub mod api;
pub mod config;
pub mod error;
pub mod html;
pub mod i18n;
pub mod logging;
pub mod server;
