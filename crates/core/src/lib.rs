//! Kickflip Funnels domain logic.
//!
//! Everything in this crate is transport- and storage-agnostic. Persistence
//! and session storage are reached through the [`service::FunnelService`]
//! and [`session::SessionStore`] ports, implemented by `kickflip-db`.

pub mod advisory;
pub mod chat;
pub mod dashboard;
pub mod editor;
pub mod element;
pub mod element_list;
pub mod error;
pub mod funnel;
pub mod render;
pub mod routing;
pub mod service;
pub mod session;
pub mod types;
pub mod workspace;
