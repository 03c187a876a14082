//! On-disk document persistence
//!
//! Every document the lifecycle writes (health report, prediction report,
//! lineage ledger, feature contract) goes through [`write_json_atomic`], so a
//! reader never observes a half-written file.

mod json;

pub use json::{read_json, read_json_opt, sha256_file, write_json_atomic};
