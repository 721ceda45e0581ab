//! Row structs and DTOs.

pub mod funnel;
