//! Resource resolution for requests from the web surface.
//!
//! The surface's custom scheme handler passes each request path to
//! [`ResourceProvider::resolve`], which maps it onto the bundled asset
//! source and tags the bytes with a MIME type.

use std::borrow::Cow;
use std::sync::Arc;

use crate::assets::AssetSource;
use crate::mime::mime_for_path;

/// Document served for the empty path.
pub const DEFAULT_DOCUMENT: &str = "index.html";

/// A resolved asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub data: Cow<'static, [u8]>,
    pub mime_type: &'static str,
}

/// Normalize a request path: drop query and fragment, strip one leading
/// `/`, and substitute [`DEFAULT_DOCUMENT`] for an empty path.
pub fn normalize_request_path(url_path: &str) -> &str {
    let end = url_path.find(['?', '#']).unwrap_or(url_path.len());
    let path = &url_path[..end];
    let path = path.strip_prefix('/').unwrap_or(path);
    if path.is_empty() { DEFAULT_DOCUMENT } else { path }
}

/// Serves bundled assets to the web surface.
///
/// Lookups are synchronous and uncached; the asset source decides where
/// bytes come from.
#[derive(Clone)]
pub struct ResourceProvider {
    source: Arc<dyn AssetSource>,
}

impl ResourceProvider {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn from_shared(source: Arc<dyn AssetSource>) -> Self {
        Self { source }
    }

    /// Resolve a request path. `None` means "not found".
    pub fn resolve(&self, url_path: &str) -> Option<Resource> {
        let path = normalize_request_path(url_path);
        match self.source.load(path) {
            Some(data) => Some(Resource {
                data,
                mime_type: mime_for_path(path),
            }),
            None => {
                log::warn!("asset not found: {path}");
                None
            }
        }
    }
}

impl std::fmt::Debug for ResourceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetDirectory, EmbeddedAsset, EmbeddedAssets};

    static FILES: &[EmbeddedAsset] = &[
        EmbeddedAsset { path: "index.html", data: b"<!doctype html>" },
        EmbeddedAsset { path: "x/y.css", data: b"p{}" },
        EmbeddedAsset { path: "blob.dat", data: &[0, 1, 2] },
    ];

    fn provider() -> ResourceProvider {
        ResourceProvider::new(EmbeddedAssets::new(FILES))
    }

    #[test]
    fn empty_path_serves_default_document() {
        for request in ["", "/"] {
            let res = provider().resolve(request).unwrap();
            assert_eq!(res.mime_type, "text/html");
            assert_eq!(&*res.data, b"<!doctype html>");
        }
    }

    #[test]
    fn leading_separator_is_stripped() {
        let res = provider().resolve("/x/y.css").unwrap();
        assert_eq!(res.mime_type, "text/css");
        assert_eq!(&*res.data, b"p{}");
    }

    #[test]
    fn missing_file_is_not_found() {
        assert!(provider().resolve("/nope.js").is_none());
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let res = provider().resolve("blob.dat").unwrap();
        assert_eq!(res.mime_type, "application/octet-stream");
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(normalize_request_path("/x/y.css?v=3"), "x/y.css");
        assert_eq!(normalize_request_path("/#top"), "index.html");
        assert!(provider().resolve("/x/y.css?v=3").is_some());
    }

    #[test]
    fn serves_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), b"<p>hi</p>").unwrap();
        let provider = ResourceProvider::new(AssetDirectory::new(dir.path()));

        let res = provider.resolve("").unwrap();
        assert_eq!(res.mime_type, "text/html");
        assert_eq!(&*res.data, b"<p>hi</p>");
        assert!(provider.resolve("/../index.html").is_none());
    }
}
