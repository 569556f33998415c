//! `ua-output`: decision-trace writers for the utility decision engine.
//!
//! | Backend | Files created                   |
//! |---------|---------------------------------|
//! | CSV     | `decisions.csv`, `events.csv`   |
//!
//! Backends implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `ua_agent::AgentObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ua_output::{CsvWriter, TraceObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer);
//! world.run_steps(600, 0.1, &mut obs)?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{DecisionRow, EventKind, EventRow};
pub use writer::TraceWriter;
