//! Model lifecycle control
//!
//! Everything that mutates the production slot lives here. Promotion and
//! rollback share one discipline: take the exclusive [`SlotLock`], stage the
//! version beside the slot, swap it in by rename, and only then append to
//! the [`LineageLedger`].

mod lineage;
mod lock;
mod promote;
mod retrain;
mod rollback;
mod scheduler;
pub mod slot;


pub use lineage::{active_history, LineageLedger, LineageRecord, Trigger};
pub use lock::SlotLock;
pub use promote::Promoter;
pub use retrain::{retrainer_from_config, CommandRetrainer, LatestExperiment, Retrainer};
pub use rollback::{RollbackManager, RollbackTrigger};
pub use scheduler::{LifecycleScheduler, RunStats, TickOutcome};
