//! Ingestion events module.
//!
//! Provides the structured warning/error events raised while a file is ingested and
//! the sink trait they are emitted through. Where events end up (log, queue, UI)
//! is decided by the sink implementation.

mod ingestion_event;
mod sink;

pub use ingestion_event::*;
pub use sink::*;
