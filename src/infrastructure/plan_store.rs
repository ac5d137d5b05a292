//! JSON file store for scraped plans
//!
//! One pretty-printed array per provider at `<dir>/<Provider>.json`. Writes
//! go to a temporary sibling first and are renamed into place, so a reader
//! never sees a half-written file and a failed run leaves the old one alone.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::debug;

use crate::domain::{RawEnergyPlan, SupplierPlan, UtilityProvider};

#[derive(Debug, Clone)]
pub struct PlanStore {
    dir: PathBuf,
}

impl PlanStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, provider: &UtilityProvider) -> PathBuf {
        self.dir.join(provider.output_file_name())
    }

    /// Replace the provider's file with `plans`.
    pub async fn write(&self, provider: &UtilityProvider, plans: &[SupplierPlan]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))?;

        let target = self.path_for(provider);
        let temp = self
            .dir
            .join(format!(".{}.tmp", provider.output_file_name()));

        let mut json = serde_json::to_string_pretty(plans).context("Failed to serialize plans")?;
        json.push('\n');

        fs::write(&temp, json)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e).with_context(|| format!("Failed to move plans into {}", target.display()));
        }

        debug!("Wrote {} plans to {}", plans.len(), target.display());
        Ok(target)
    }

    /// Read the provider's file leniently, for display.
    pub async fn read_raw(&self, provider: &UtilityProvider) -> Result<Vec<RawEnergyPlan>> {
        read_raw_file(&self.path_for(provider)).await
    }
}

/// Read any plan file as lenient records.
pub async fn read_raw_file(path: &Path) -> Result<Vec<RawEnergyPlan>> {
    let text = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not a plan array", path.display()))
}
