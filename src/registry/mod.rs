//! Model registry
//!
//! Experiments are directories under `experiments_dir`, each holding an
//! opaque artifact plus its [`ModelMetadata`]. The production slot is a
//! single directory that serving reads from.
//!
//! Promotion eligibility is decided here ([`ModelSelector`]); the slot swap
//! itself lives in [`crate::lifecycle`].

pub mod contract;
mod metadata;
pub mod schema;
mod selector;
mod store;


pub use contract::{ContractField, ContractViolation, FeatureContract, FieldKind, Record};
pub use metadata::{CacheKey, MetadataCache, ModelMetadata};
pub use schema::{compare, SchemaChange, SchemaDiff};
pub use selector::{DecisionReason, ModelSelector, PromotionDecision, DEFAULT_METRIC};
pub use store::{ModelStore, SLOT_DIR};
