//! Package discovery in a Go module cache.
//!
//! The module cache (`$GOPATH/pkg/mod`) stores every downloaded module in a
//! directory named `<module path>@<version>`, with upper-case letters escaped
//! as `!` followed by the lower-case letter:
//!
//! ```text
//! pkg/mod/
//! ├── cache/download/...                  (ignored)
//! ├── github.com/!burnt!sushi/toml@v1.3.2 → github.com/BurntSushi/toml
//! ├── github.com/gorilla/mux@v1.8.1       → github.com/gorilla/mux
//! └── github.com/jackc/pgx/v5@v5.5.0      → github.com/jackc/pgx/v5
//! ```

use crate::domain::error::Result;
use crate::domain::is_package_path;
use std::collections::BTreeSet;
use std::io;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Top-level directory of the cache that holds downloads, not modules.
const DOWNLOAD_CACHE_DIR: &str = "cache";

/// Extracts the module path from a directory path relative to the cache root.
///
/// Returns `None` until some component carries an `@version` suffix, and for
/// anything under the download cache.
///
/// # Examples
///
/// ```
/// use rummage::infrastructure::module_path;
/// use std::path::Path;
///
/// assert_eq!(
///     module_path(Path::new("github.com/!burnt!sushi/toml@v1.3.2/internal")).as_deref(),
///     Some("github.com/BurntSushi/toml"),
/// );
/// assert_eq!(module_path(Path::new("github.com/gorilla")), None);
/// ```
#[must_use]
pub fn module_path(relative: &Path) -> Option<String> {
    let mut segments = Vec::new();

    for component in relative.components() {
        let Component::Normal(name) = component else {
            return None;
        };
        let name = name.to_str()?;

        if segments.is_empty() && name == DOWNLOAD_CACHE_DIR {
            return None;
        }

        if let Some((module, _version)) = name.split_once('@') {
            segments.push(module);
            return Some(unescape(&segments.join("/")));
        }
        segments.push(name);
    }

    None
}

/// Reverses the module cache case encoding (`!x` becomes `X`).
#[must_use]
pub fn unescape(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        if c == '!' {
            match chars.next() {
                Some(next) => result.extend(next.to_uppercase()),
                None => result.push(c),
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Walks a module cache and returns the package paths found in it.
///
/// Descent stops at the first `@version` directory of each module. Paths that
/// do not look like package paths are dropped. The result is sorted and
/// free of duplicates.
///
/// # Errors
///
/// Returns an I/O error if `root` is missing or not a directory. Unreadable
/// entries below the root are logged and skipped.
pub fn scan_module_cache(root: &Path) -> Result<Vec<String>> {
    let _span = tracing::debug_span!("scan_module_cache", root = %root.display()).entered();

    let mut found = BTreeSet::new();
    let mut walker = WalkDir::new(root).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(io::Error::from(e).into()),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry in module cache");
                continue;
            }
        };

        if !entry.file_type().is_dir() {
            if entry.depth() == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a directory", root.display()),
                )
                .into());
            }
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if entry.depth() == 1 && relative.as_os_str() == DOWNLOAD_CACHE_DIR {
            walker.skip_current_dir();
            continue;
        }

        if let Some(module) = module_path(relative) {
            if is_package_path(&module) {
                found.insert(module);
            } else {
                tracing::debug!(module = %module, "ignoring non-package module directory");
            }
            walker.skip_current_dir();
        }
    }

    tracing::debug!(package_count = found.len(), "module cache scanned");
    Ok(found.into_iter().collect())
}
