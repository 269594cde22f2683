// Application layer - use cases and orchestration.
// Transformers turn source rows into ledger lines, the aggregator summarizes
// a run, and the service ties reading, exporting and recording together.

pub mod billing;
pub mod error;
pub mod lookup;
pub mod payment;
pub mod service;
pub mod statistics;

pub use billing::*;
pub use error::*;
pub use lookup::*;
pub use payment::*;
pub use service::*;
pub use statistics::*;
