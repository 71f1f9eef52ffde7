//! Cache store - Read/write the cachef.txt cache file
//!
//! The file holds one canonical path per line. It is shared state with no
//! locking: two processes inserting or cleaning at the same time can
//! interleave writes or lose updates. Cleaning truncates and rewrites in
//! place, so an interrupted clean can leave the file truncated.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::error::{CacheError, CacheResult};
use crate::core::paths::{entry_for, resolve};

/// Line counts produced by [`clean`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanReport {
    pub kept: usize,
    pub removed: usize,
}

fn open_for_append(cache_file: &Path) -> CacheResult<File> {
    OpenOptions::new()
        .append(true)
        .open(cache_file)
        .map_err(|e| CacheError::from_open(e, cache_file))
}

fn append_entry(file: &mut File, canonical: &Path) -> CacheResult<()> {
    writeln!(file, "{}", entry_for(canonical)?)?;
    Ok(())
}

/// Read every line of the cache file, trimmed, in file order
pub fn read_all(cache_file: &Path) -> CacheResult<Vec<String>> {
    let file = File::open(cache_file).map_err(|e| CacheError::from_open(e, cache_file))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?.trim().to_string());
    }

    Ok(lines)
}

/// Check whether `canonical` is already a line of the cache file
#[allow(dead_code)]
pub fn contains(canonical: &Path, cache_file: &Path) -> CacheResult<bool> {
    let entry = entry_for(canonical)?;
    Ok(read_all(cache_file)?.iter().any(|line| *line == entry))
}

/// Create the cache directory and an empty cache file if absent
pub fn ensure_initialized(cache_file: &Path) -> CacheResult<()> {
    if let Some(parent) = cache_file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            debug!(dir = %parent.display(), "created cache directory");
        }
    }

    if !cache_file.exists() {
        // append keeps existing content if another process created it meanwhile
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(cache_file)?;
        debug!(file = %cache_file.display(), "created cache file");
    }

    Ok(())
}

/// Cache the canonical form of `path`.
///
/// Returns the appended path, or `None` when it was already cached. The cache
/// file must exist; see [`ensure_initialized`].
#[allow(dead_code)]
pub fn insert_one(path: &Path, cache_file: &Path) -> CacheResult<Option<PathBuf>> {
    let canonical = resolve(path)?;

    if contains(&canonical, cache_file)? {
        debug!(path = %canonical.display(), "already cached");
        return Ok(None);
    }

    let mut file = open_for_append(cache_file)?;
    append_entry(&mut file, &canonical)?;
    debug!(path = %canonical.display(), "cached");

    Ok(Some(canonical))
}

/// Cache the canonical forms of `paths`, creating the cache file if needed.
///
/// Membership is checked against one snapshot read before the first write.
/// Inputs that resolve to the same canonical path within one call are each
/// appended, since none of them is in the snapshot.
pub fn insert_many<P: AsRef<Path>>(paths: &[P], cache_file: &Path) -> CacheResult<Vec<PathBuf>> {
    ensure_initialized(cache_file)?;
    let snapshot = read_all(cache_file)?;

    let mut file = open_for_append(cache_file)?;
    let mut appended = Vec::new();

    for path in paths {
        let canonical = resolve(path.as_ref())?;
        let entry = entry_for(&canonical)?;

        if snapshot.contains(&entry) {
            debug!(path = %entry, "already cached");
            continue;
        }

        writeln!(file, "{}", entry)?;
        debug!(path = %entry, "cached");
        appended.push(canonical);
    }

    Ok(appended)
}

/// Whether a cache line still names something on disk.
///
/// A blank line is the empty path, which stands for the current directory.
fn still_exists(line: &str) -> bool {
    if line.is_empty() {
        Path::new(".").exists()
    } else {
        Path::new(line).exists()
    }
}

/// Drop lines whose path no longer exists and rewrite the cache file
pub fn clean(cache_file: &Path) -> CacheResult<CleanReport> {
    let lines = read_all(cache_file)?;
    let total = lines.len();

    let survivors: Vec<String> = lines
        .into_iter()
        .filter(|line| {
            let exists = still_exists(line);
            if !exists {
                debug!(path = %line, "dropping stale entry");
            }
            exists
        })
        .collect();

    let mut writer = BufWriter::new(File::create(cache_file)?);
    if survivors.is_empty() {
        writeln!(writer)?;
    }
    for line in &survivors {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;

    let report = CleanReport {
        kept: survivors.len(),
        removed: total - survivors.len(),
    };
    info!(
        kept = report.kept,
        removed = report.removed,
        "cleaned cache file"
    );

    Ok(report)
}
