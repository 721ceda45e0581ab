pub mod advisory;
pub mod auth;
pub mod dashboard;
pub mod funnels;
pub mod pages;
pub mod workspace;
