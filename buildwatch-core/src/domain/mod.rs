//! Core domain types
//!
//! This module contains the structures that flow between the poller, the
//! event batch processor and the caller. The poller only inspects the event
//! discriminator; everything else is owned by the processor and the caller.

pub mod callbacks;
pub mod event;
pub mod results;
