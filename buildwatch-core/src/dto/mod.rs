//! Data Transfer Objects for the build service API
//!
//! Request and response bodies exchanged with the build service around a
//! polling session (starting and cancelling builds).

pub mod build;
