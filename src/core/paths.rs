//! Path resolution and cache file location
//!
//! Every path stored in the cache is canonical: absolute, with symlinks
//! resolved. Resolution does not require the path to exist.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Directory created under the cache root
pub const CACHE_DIR_NAME: &str = "cachef";

/// Name of the cache file inside [`CACHE_DIR_NAME`]
pub const CACHE_FILE_NAME: &str = "cachef.txt";

/// Symlinks followed before the rest of a path is taken literally
const MAX_SYMLINK_HOPS: usize = 40;

/// Resolve `path` to its canonical form.
///
/// Relative paths are taken from the current directory. Components are walked
/// one at a time: symlinks are followed even when their target is missing,
/// `..` pops the path resolved so far, and a component that does not exist is
/// appended as-is.
pub fn resolve(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    if let Ok(canonical) = absolute.canonicalize() {
        return Ok(canonical);
    }

    let mut pending = steps(&absolute);
    pending.reverse();
    let mut resolved = PathBuf::new();
    let mut hops = 0;

    while let Some(step) = pending.pop() {
        match step {
            Step::Root(root) => resolved.push(root),
            Step::Parent => {
                resolved.pop();
            }
            Step::Name(name) => {
                let candidate = resolved.join(&name);
                let is_symlink = fs::symlink_metadata(&candidate)
                    .map(|meta| meta.file_type().is_symlink())
                    .unwrap_or(false);

                if is_symlink && hops < MAX_SYMLINK_HOPS {
                    hops += 1;
                    let target = fs::read_link(&candidate)?;
                    // absolute targets restart from their own root step
                    pending.extend(steps(&target).into_iter().rev());
                } else {
                    resolved = candidate;
                }
            }
        }
    }

    Ok(resolved)
}

enum Step {
    Root(OsString),
    Parent,
    Name(OsString),
}

fn steps(path: &Path) -> Vec<Step> {
    path.components()
        .filter_map(|component| match component {
            Component::Prefix(_) | Component::RootDir => {
                Some(Step::Root(component.as_os_str().to_os_string()))
            }
            Component::CurDir => None,
            Component::ParentDir => Some(Step::Parent),
            Component::Normal(name) => Some(Step::Name(name.to_os_string())),
        })
        .collect()
}

/// String form of a canonical path, as written to a cache line.
///
/// Fails with `InvalidData` for paths that are not valid UTF-8.
pub fn entry_for(canonical: &Path) -> io::Result<String> {
    canonical.to_str().map(str::to_string).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("path is not valid UTF-8: {}", canonical.display()),
        )
    })
}

/// Where the cache file lives.
///
/// Computed once at startup and passed to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    file: PathBuf,
}

impl CacheLocation {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    /// Default location from `XDG_CACHE_HOME`, falling back to the home directory
    pub fn from_env() -> Option<Self> {
        let xdg = std::env::var_os("XDG_CACHE_HOME");
        Self::from_vars(xdg.as_deref(), dirs::home_dir())
    }

    /// `$XDG_CACHE_HOME/cachef/cachef.txt` when set and non-empty, else `$HOME/cachef/cachef.txt`
    pub fn from_vars(xdg_cache_home: Option<&OsStr>, home: Option<PathBuf>) -> Option<Self> {
        let root = match xdg_cache_home {
            Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
            _ => home?,
        };
        Some(Self::new(root.join(CACHE_DIR_NAME).join(CACHE_FILE_NAME)))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}
