//! Wire protocol types for the chunked upload endpoints.
//!
//! Every endpoint answers with the same JSON envelope: a numeric
//! `response_code` (`0` on success) and a stage-specific `data` payload.

pub mod constants;
pub mod envelope;
pub mod messages;

pub use constants::{FAILURE_CODE, SUCCESS_CODE};
pub use envelope::Envelope;
pub use messages::{CheckData, CheckQuery, ChunkFields, MergeRequest, ProcessRequest};
