//! # Route Modules
//!
//! Each module defines an Axum router for one API surface. They are merged
//! in [`crate::app`].

pub mod batches;
pub mod farmers;
pub mod log;
pub mod tools;
pub mod trail;
