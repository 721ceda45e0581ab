//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod funnel_repo;

pub use funnel_repo::FunnelRepo;
