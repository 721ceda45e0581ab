//! Request extractors.
//!
//! - [`session::SessionUser`] -- Requires a signed-in user.

pub mod session;
