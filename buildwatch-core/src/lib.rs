//! Buildwatch Core
//!
//! Core types and abstractions shared by the buildwatch client and CLI.
//!
//! This crate contains:
//! - Domain types: build events, the result accumulator, build callbacks
//! - DTOs: request/response bodies of the build service
//! - NDJSON decoding of polled event batches
//! - The event batch processor seam and its standard implementation

pub mod domain;
pub mod dto;
pub mod ndjson;
pub mod processor;

pub use domain::callbacks::{BuildCallbacks, BuildStatus};
pub use domain::event::{BuildEvent, END_EVENT};
pub use domain::results::BuildResults;
pub use processor::{
    ChannelEventSink, EventBatchProcessor, EventSink, NoopEventSink, StandardBatchProcessor,
};
