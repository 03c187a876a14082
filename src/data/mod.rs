//! Feature tables
//!
//! Reference data (captured at training time) and the live prediction log
//! are both CSV files. They are loaded column-wise so drift can be measured
//! one feature at a time.

mod table;

pub use table::{Column, FeatureTable};
