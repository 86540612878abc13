//! MIME type detection for web assets.

/// Type served for unrecognized extensions.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Detect MIME type from a file path's extension.
///
/// Matching is case-insensitive. Paths without an extension get
/// [`FALLBACK_MIME`].
pub fn mime_for_path(path: &str) -> &'static str {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return FALLBACK_MIME;
    };
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "wasm" => "application/wasm",
        "map" => "application/json",
        _ => FALLBACK_MIME,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_for_path("index.html"), "text/html");
        assert_eq!(mime_for_path("x/y.css"), "text/css");
        assert_eq!(mime_for_path("assets/app.js"), "text/javascript");
        assert_eq!(mime_for_path("fonts/a.woff2"), "font/woff2");
        assert_eq!(mime_for_path("img/logo.JPG"), "image/jpeg");
    }

    #[test]
    fn unknown_or_missing_extension_falls_back() {
        assert_eq!(mime_for_path("data.bin"), FALLBACK_MIME);
        assert_eq!(mime_for_path("LICENSE"), FALLBACK_MIME);
        assert_eq!(mime_for_path("dir.v2/README"), FALLBACK_MIME);
    }
}
