//! Sources of bundled web assets.
//!
//! Two sources exist:
//!
//! - [`EmbeddedAssets`] - files compiled into the plugin binary
//! - [`AssetDirectory`] - a directory shipped next to the plugin binary
//!   (`<binary dir>/Resources/WebUI`)
//!
//! Both take paths relative to the asset root with `/` separators. Neither
//! resolves paths outside the root.

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Directory, relative to the plugin binary's directory, holding the built UI.
pub const BUNDLED_UI_DIR: [&str; 2] = ["Resources", "WebUI"];

/// Lookup of asset bytes by relative path.
pub trait AssetSource: Send + Sync {
    /// Bytes of the asset at `path`, or `None` if there is no such file.
    fn load(&self, path: &str) -> Option<Cow<'static, [u8]>>;
}

// =========================================================================
// Embedded assets
// =========================================================================

/// A single file embedded at compile time.
#[derive(Debug)]
pub struct EmbeddedAsset {
    /// Relative path within the UI directory (e.g. "index.html", "assets/style.css").
    pub path: &'static str,
    /// File contents.
    pub data: &'static [u8],
}

/// Collection of embedded web assets.
#[derive(Debug)]
pub struct EmbeddedAssets {
    assets: &'static [EmbeddedAsset],
}

impl EmbeddedAssets {
    pub const fn new(assets: &'static [EmbeddedAsset]) -> Self {
        Self { assets }
    }

    /// Look up a file by path (e.g. "index.html", "assets/style.css").
    pub fn get(&self, path: &str) -> Option<&'static [u8]> {
        self.assets.iter().find(|a| a.path == path).map(|a| a.data)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetSource for EmbeddedAssets {
    fn load(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        self.get(path).map(Cow::Borrowed)
    }
}

// =========================================================================
// Asset directory
// =========================================================================

/// Assets read from a directory on disk at request time. No caching.
#[derive(Debug, Clone)]
pub struct AssetDirectory {
    root: PathBuf,
}

impl AssetDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bundled UI directory for a plugin binary at `binary`.
    pub fn for_binary(binary: &Path) -> Self {
        let mut root = binary.parent().map(Path::to_path_buf).unwrap_or_default();
        root.extend(BUNDLED_UI_DIR);
        Self::new(root)
    }

    /// The bundled UI directory next to the running executable.
    pub fn beside_current_exe() -> std::io::Result<Self> {
        Ok(Self::for_binary(&std::env::current_exe()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto a file below the root.
    ///
    /// Returns `None` for paths that would leave the root: parent
    /// components, absolute paths, drive or UNC prefixes, and symlinks
    /// pointing outside.
    pub fn contained_path(&self, path: &str) -> Option<PathBuf> {
        let relative = sanitize_relative(path)?;
        let candidate = self.root.join(relative);

        // Symlinks are only resolvable for files that exist; missing files
        // are reported as not found by the caller anyway.
        let (Ok(root), Ok(resolved)) = (self.root.canonicalize(), candidate.canonicalize()) else {
            return None;
        };
        if !resolved.starts_with(&root) {
            log::warn!("asset path escapes the UI root: {path}");
            return None;
        }
        Some(resolved)
    }
}

/// Convert a `/`-separated request path into a relative path with only
/// normal components.
fn sanitize_relative(path: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for segment in path.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment.contains('\\') || segment.contains(':') {
            return None;
        }
        match Path::new(segment).components().next() {
            Some(Component::Normal(part)) => out.push(part),
            _ => return None,
        }
    }
    (!out.as_os_str().is_empty()).then_some(out)
}

impl AssetSource for AssetDirectory {
    fn load(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        let file = self.contained_path(path)?;
        if !file.is_file() {
            return None;
        }
        match std::fs::read(&file) {
            Ok(bytes) => Some(Cow::Owned(bytes)),
            Err(e) => {
                log::warn!("failed to read asset {}: {e}", file.display());
                None
            }
        }
    }
}
