//! Staged, rename-based replacement of the production slot.
//!
//! A version is first copied into a sibling staging directory and verified.
//! Only then is the live slot touched: `current` is renamed aside, the staged
//! directory is renamed into place, and the retired copy is removed. If the
//! second rename fails the retired copy is renamed back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::io::sha256_file;
use crate::registry::{FeatureContract, ModelStore};
use crate::{Error, Result};

const STAGING_PREFIX: &str = ".staging-";
const RETIRED_DIR: &str = ".retired";

/// A fully written copy of one version, ready to swap in
#[derive(Debug)]
pub struct StagedSlot {
    dir: PathBuf,
    version: String,
}

impl StagedSlot {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Remove the staging directory without swapping
    pub fn discard(self) {
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), error = %e, "failed to discard staged slot");
        }
    }
}

/// Copy `version`'s artifact and metadata plus its contract into a staging directory
///
/// The copied artifact is hashed and compared against the source before the
/// stage is handed back.
pub fn stage(store: &ModelStore, version: &str, contract: &FeatureContract) -> Result<StagedSlot> {
    let staging = store.production_dir().join(format!("{STAGING_PREFIX}{version}"));
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;
    let staged = StagedSlot { dir: staging, version: version.to_string() };

    match populate(store, version, contract, &staged.dir) {
        Ok(()) => {
            tracing::debug!(version, dir = %staged.dir.display(), "slot staged");
            Ok(staged)
        }
        Err(e) => {
            staged.discard();
            Err(e)
        }
    }
}

fn populate(store: &ModelStore, version: &str, contract: &FeatureContract, dir: &Path) -> Result<()> {
    let source_artifact = store.artifact_path(version);
    let staged_artifact = dir.join(store.artifact_file());
    fs::copy(&source_artifact, &staged_artifact)?;
    fs::copy(store.metadata_path(version), dir.join(store.metadata_file()))?;
    contract.save(&dir.join(store.contract_file()))?;

    let expected = sha256_file(&source_artifact)?;
    let actual = sha256_file(&staged_artifact)?;
    if expected != actual {
        return Err(Error::IntegrityMismatch { path: staged_artifact, expected, actual });
    }
    Ok(())
}

/// Replace the production slot with a staged copy
///
/// On error the previous slot contents are back in place.
pub fn swap(store: &ModelStore, staged: StagedSlot) -> Result<()> {
    let current = store.slot_dir();
    let retired = store.production_dir().join(RETIRED_DIR);

    if retired.exists() {
        fs::remove_dir_all(&retired)?;
    }

    let had_current = current.exists();
    if had_current {
        if let Err(e) = fs::rename(&current, &retired) {
            staged.discard();
            return Err(e.into());
        }
    }

    if let Err(e) = fs::rename(&staged.dir, &current) {
        if had_current {
            if let Err(restore) = fs::rename(&retired, &current) {
                tracing::error!(error = %restore, "failed to restore retired slot");
            }
        }
        staged.discard();
        return Err(e.into());
    }

    if had_current {
        if let Err(e) = fs::remove_dir_all(&retired) {
            tracing::warn!(error = %e, "retired slot not removed");
        }
    }
    tracing::debug!(version = %staged.version, "slot swapped");
    Ok(())
}

/// Stage and swap in one step
pub fn install(store: &ModelStore, version: &str, contract: &FeatureContract) -> Result<()> {
    let staged = stage(store, version, contract)?;
    swap(store, staged)
}
