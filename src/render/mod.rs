//! Output assembly and JSON rendering.

mod json;
mod report;

pub use json::{to_json, write_json, JsonFormat};
pub use report::{assemble_report, global_summary, processing_timestamp};
