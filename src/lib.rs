//! Relevo: an unattended model-lifecycle control loop
//!
//! Relevo keeps a single production model healthy without a human in the
//! loop. On every cycle it:
//!
//! - measures per-feature drift between the training reference and live
//!   traffic with the Population Stability Index ([`monitor::psi`])
//! - turns the scores into a health verdict ([`monitor::HealthEvaluator`])
//! - asks a [`lifecycle::Retrainer`] for a candidate when retraining is
//!   recommended, and runs a champion/challenger comparison against the
//!   serving model ([`registry::ModelSelector`])
//! - promotes winners into the production slot atomically and records every
//!   change in an append-only lineage ledger ([`lifecycle::Promoter`])
//! - reverts to the previous model when the rollback trigger fires
//!   ([`lifecycle::RollbackManager`])
//!
//! # Example
//!
//! ```no_run
//! use relevo::config::load_config;
//! use relevo::lifecycle::LifecycleScheduler;
//!
//! let config = load_config("relevo.yaml")?;
//! let mut scheduler = LifecycleScheduler::from_config(&config)?;
//! let stats = scheduler.run(Some(1));
//! println!("{} promotions", stats.promotions);
//! # Ok::<(), relevo::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod lifecycle;
pub mod monitor;
pub mod registry;

pub use error::{Error, Result};
