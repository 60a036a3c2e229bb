//! Example REST resource
//!
//! [`users`] holds the handlers, [`router`] maps requests onto them.

pub mod router;
pub mod users;

pub use router::{Method, Request, Response, Router};
pub use users::{User, UserStore};
