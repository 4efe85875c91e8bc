//! Extension-based content type inference for uploaded objects.

use std::path::Path;

/// Used when the key has no extension or the extension is not recognised.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Infer the MIME type of an object from its key.
pub fn infer_content_type(key: &str) -> &'static str {
    Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(content_type_from_extension)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

fn content_type_from_extension(ext: &str) -> Option<&'static str> {
    let content_type = match ext.to_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "text/javascript",
        "json" | "map" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/vnd.microsoft.icon",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "wasm" => "application/wasm",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_is_detected() {
        assert_eq!(infer_content_type("index.html"), "text/html");
        assert_eq!(infer_content_type("blog/post.HTM"), "text/html");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(infer_content_type("style.unknownext"), DEFAULT_CONTENT_TYPE);
        assert_eq!(infer_content_type("LICENSE"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn test_extension_only_looks_at_last_segment() {
        assert_eq!(infer_content_type("assets.v2/app.min.js"), "text/javascript");
        assert_eq!(infer_content_type("img.d/logo"), DEFAULT_CONTENT_TYPE);
        assert_eq!(infer_content_type(".well-known/security.txt"), "text/plain");
    }
}
