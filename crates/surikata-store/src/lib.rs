//! # surikata-store
//!
//! Storage contracts for Surikata and the in-memory backend.
//!
//! - [`QuestionSource`]: the read used by live fan-out
//! - [`QuestionStorage`], [`EventStorage`], [`SpeakerStorage`]: write paths
//! - [`DataStorage`]: blanket combination of the three
//! - [`MemoryStore`]: `parking_lot`-guarded in-process implementation

#![deny(unsafe_code)]

pub mod errors;
pub mod memory;
pub mod traits;

pub use errors::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{DataStorage, EventStorage, QuestionSource, QuestionStorage, SpeakerStorage};
