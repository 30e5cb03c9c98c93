//! Cache eviction by age and count

use asl_common::config::CacheLimits;
use asl_common::Result;
use chrono::{DateTime, Local, TimeDelta};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Files removed by one eviction run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionReport {
    pub removed_by_age: Vec<PathBuf>,
    pub removed_by_count: Vec<PathBuf>,
}

impl EvictionReport {
    pub fn total(&self) -> usize {
        self.removed_by_age.len() + self.removed_by_count.len()
    }
}

/// Evict cached files
///
/// Files older than `max_age_days` go first; then the oldest files are
/// removed until at most `max_files` remain. A missing cache directory is
/// an empty cache.
pub fn evict(cache_dir: &Path, limits: CacheLimits) -> Result<EvictionReport> {
    let mut report = EvictionReport::default();

    if limits.max_files.is_none() && limits.max_age_days.is_none() {
        debug!("Cache cleanup skipped - no limits set");
        return Ok(report);
    }
    if !cache_dir.is_dir() {
        return Ok(report);
    }

    if let Some(days) = limits.max_age_days {
        let now = Local::now();
        let cutoff = TimeDelta::try_days(i64::try_from(days).unwrap_or(i64::MAX))
            .and_then(|age| now.checked_sub_signed(age));

        if let Some(cutoff) = cutoff {
            for (path, modified) in files_oldest_first(cache_dir)? {
                if DateTime::<Local>::from(modified) < cutoff {
                    debug!("Deleting (age): {}", path.display());
                    remove(&path)?;
                    report.removed_by_age.push(path);
                }
            }
        }
    }

    if let Some(max_files) = limits.max_files {
        let remaining = files_oldest_first(cache_dir)?;
        let excess = remaining.len().saturating_sub(max_files);
        for (path, _) in remaining.into_iter().take(excess) {
            debug!("Deleting (count): {}", path.display());
            remove(&path)?;
            report.removed_by_count.push(path);
        }
    }

    if report.total() > 0 {
        info!(
            by_age = report.removed_by_age.len(),
            by_count = report.removed_by_count.len(),
            "Cache cleanup removed {} files from {}",
            report.total(),
            cache_dir.display()
        );
    }
    Ok(report)
}

fn files_oldest_first(dir: &Path) -> Result<Vec<(PathBuf, SystemTime)>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            files.push((entry.path(), metadata.modified()?));
        }
    }
    files.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(files)
}

/// Already-removed files are not an error
fn remove(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
