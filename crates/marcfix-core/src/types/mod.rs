//! Core marcfix types.
//!
//! These types enforce their invariants at construction time, so an
//! invalid record id or batch id never reaches any I/O.

mod api_url;
mod batch_id;
mod record_id;
mod time_window;

pub use api_url::ApiUrl;
pub use batch_id::BatchId;
pub use record_id::RecordId;
pub use time_window::TimeWindow;
