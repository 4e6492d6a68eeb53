//! Per-message decision pipeline.
//!
//! Every inbound message flows through, in order:
//! 1. channel eligibility — a bound response channel silences all
//!    other channels except prefixed commands
//! 2. profanity gate — delete + timeout + notice
//! 3. link gate — delete + ban + notice, unless admin / media /
//!    exception channel
//! 4. command dispatch
//! 5. bound-channel fallthrough to the conversational relay
//!
//! Gates short-circuit: the first one that fires ends processing.
//! Direct messages skip the store lookup and all gates and go straight
//! to the relay.

pub mod processor;
pub mod types;

pub use processor::MessagePipeline;
pub use types::{AnnounceOutcome, Disposition, InboundMessage, ProcessedMessage};
