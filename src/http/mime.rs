//! MIME type detection module
//!
//! Content-Type is decided from the logical file name, i.e. the request path
//! with at most one trailing compression suffix (`.br` / `.gz`) removed.
//! Unity build artifacts get hardcoded types because generic extension
//! tables do not know `.data` and some browsers refuse to instantiate WASM
//! without the exact type.

/// Strip exactly one trailing compression suffix from a path.
///
/// `"Build/game.wasm.br"` becomes `"Build/game.wasm"`; a path without a
/// compression suffix is returned unchanged.
pub fn logical_path(path: &str) -> &str {
    path.strip_suffix(".br")
        .or_else(|| path.strip_suffix(".gz"))
        .unwrap_or(path)
}

/// Get the Content-Type for a request path, compressed or not.
///
/// The Unity special cases are substring matches on the logical path, which
/// mirrors how the WebGL loader names its artifacts (`game.wasm.br`,
/// `game.data.unityweb`). A directory segment containing `.data` would also
/// match; kept as-is since Unity build trees do not produce such names.
pub fn content_type_for(path: &str) -> &'static str {
    let logical = logical_path(path);

    if logical.contains(".js") {
        return "application/javascript";
    }
    if logical.contains(".wasm") {
        return "application/wasm";
    }
    if logical.contains(".data") {
        return "application/octet-stream";
    }

    let extension = logical.rsplit('.').next().filter(|e| *e != logical);
    get_content_type(extension)
}

/// Get MIME Content-Type based on file extension
pub fn get_content_type(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs") => "application/javascript",
        Some("json") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Audio/Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogg" | "ogv") => "video/ogg",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",

        // Default
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_path_strips_one_suffix() {
        assert_eq!(logical_path("/Build/game.wasm.br"), "/Build/game.wasm");
        assert_eq!(logical_path("/Build/game.data.gz"), "/Build/game.data");
        assert_eq!(logical_path("/index.html"), "/index.html");
        // Only one suffix comes off
        assert_eq!(logical_path("/weird.gz.br"), "/weird.gz");
    }

    #[test]
    fn test_unity_special_cases() {
        assert_eq!(content_type_for("/Build/game.wasm"), "application/wasm");
        assert_eq!(content_type_for("/Build/game.wasm.br"), "application/wasm");
        assert_eq!(
            content_type_for("/Build/game.framework.js.gz"),
            "application/javascript"
        );
        assert_eq!(
            content_type_for("/Build/game.data.br"),
            "application/octet-stream"
        );
        // Substring matching applies anywhere in the logical path
        assert_eq!(
            content_type_for("/Build/game.data.unityweb"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_generic_types() {
        assert_eq!(content_type_for("/index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type_for("/style.css.gz"), "text/css");
        assert_eq!(content_type_for("/logo.png"), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for("/blob.xyz"), "application/octet-stream");
        assert_eq!(content_type_for("/no-extension"), "application/octet-stream");
        assert_eq!(get_content_type(None), "application/octet-stream");
    }
}
