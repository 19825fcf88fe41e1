//! Compressed-variant resolution and file serving
//!
//! The heart of the server: given a request path, decide which file on disk
//! satisfies it. Unity WebGL builds ship artifacts as `name.ext`,
//! `name.ext.br` or `name.ext.gz`, and the loader requests the logical name
//! without caring which variant the build produced. Resolution is therefore
//! done against the filesystem, not against the client's `Accept-Encoding`.

use crate::config::AppState;
use crate::http::{mime, response, ResponseBody};
use crate::logger;
use hyper::Response;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Compression variant of a file on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Brotli,
    Gzip,
}

impl ContentCoding {
    /// Value for the `Content-Encoding` header
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::Brotli => "br",
            Self::Gzip => "gzip",
        }
    }

    /// File name suffix of this variant
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Brotli => ".br",
            Self::Gzip => ".gz",
        }
    }

    /// Detect the coding from a file name's own suffix
    pub fn from_path(path: &str) -> Option<Self> {
        if path.ends_with(".br") {
            Some(Self::Brotli)
        } else if path.ends_with(".gz") {
            Some(Self::Gzip)
        } else {
            None
        }
    }
}

/// Result of resolving a request path: the file that will actually be
/// streamed plus the headers to advertise. Built fresh per request; `size`
/// comes from a fresh stat so it tracks files rewritten between requests.
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub encoding: Option<ContentCoding>,
    pub size: u64,
}

/// Serve a GET/HEAD request for `request_path` rooted at the document root.
pub async fn serve(
    state: &AppState,
    request_path: &str,
    is_head: bool,
) -> Response<ResponseBody> {
    let Some(resolved) = resolve(
        &state.root,
        request_path,
        &state.config.files.index_files,
    )
    .await
    else {
        return response::build_404_response("no file or compressed variant matches");
    };

    let encoding = resolved.encoding.map(ContentCoding::header_value);

    if is_head {
        return response::build_file_response(
            response::empty_body(),
            resolved.content_type,
            encoding,
            resolved.size,
        );
    }

    // The file can disappear between resolution and open when a build is
    // rewriting its output tree; treat that as a plain 404.
    match fs::File::open(&resolved.path).await {
        Ok(file) => response::build_file_response(
            response::file_body(file),
            resolved.content_type,
            encoding,
            resolved.size,
        ),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to open '{}': {e}",
                resolved.path.display()
            ));
            response::build_404_response(&format!("File not found: {e}"))
        }
    }
}

/// Resolve a request path to a file on disk.
///
/// Policy, first match wins:
/// 1. the path itself, served with the encoding its own suffix implies
/// 2. the `.br` sibling, served as Brotli
/// 3. the `.gz` sibling, served as Gzip
/// 4. index file resolution for directories
pub async fn resolve(
    root: &Path,
    request_path: &str,
    index_files: &[String],
) -> Option<ResolvedFile> {
    // Strip the leading slash and neutralize traversal segments; the
    // canonicalize check below catches anything this misses (symlinks).
    let clean_path = request_path.trim_start_matches('/').replace("..", "");
    let fs_path = root.join(&clean_path);

    // 1. Exact match
    if let Some((path, size)) = regular_file(root, &fs_path).await {
        return Some(ResolvedFile {
            path,
            content_type: mime::content_type_for(request_path),
            encoding: ContentCoding::from_path(request_path),
            size,
        });
    }

    // 2./3. Compressed siblings, Brotli preferred
    for coding in [ContentCoding::Brotli, ContentCoding::Gzip] {
        let candidate = append_suffix(&fs_path, coding.suffix());
        if let Some((path, size)) = regular_file(root, &candidate).await {
            return Some(ResolvedFile {
                path,
                content_type: mime::content_type_for(request_path),
                encoding: Some(coding),
                size,
            });
        }
    }

    // 4. Generic fallback: index files for directory requests
    if fs_path.is_dir() || clean_path.is_empty() || clean_path.ends_with('/') {
        for index_file in index_files {
            let index_path = fs_path.join(index_file);
            if let Some((path, size)) = regular_file(root, &index_path).await {
                return Some(ResolvedFile {
                    path,
                    content_type: mime::content_type_for(index_file),
                    encoding: None,
                    size,
                });
            }
        }
    }

    None
}

/// Canonical path and size if `path` is an existing regular file inside the
/// document root.
async fn regular_file(root: &Path, path: &Path) -> Option<(PathBuf, u64)> {
    let meta = fs::metadata(path).await.ok()?;
    if !meta.is_file() {
        return None;
    }
    let canonical = fs::canonicalize(path).await.ok()?;
    if !canonical.starts_with(root) {
        logger::log_warning(&format!(
            "Path escapes document root, rejected: {}",
            path.display()
        ));
        return None;
    }
    Some((canonical, meta.len()))
}

/// Append a compression suffix to the full file name (`game.wasm` ->
/// `game.wasm.br`). `Path::with_extension` would replace the extension
/// instead of stacking the suffix.
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(root: &Path, name: &str, content: &[u8]) {
        if let Some(parent) = root.join(name).parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut f = File::create(root.join(name)).unwrap();
        f.write_all(content).unwrap();
    }

    fn test_root() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        // Canonicalize so the root-escape check compares like with like
        let root = dir.path().canonicalize().unwrap();
        (dir, root)
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    #[tokio::test]
    async fn test_brotli_fallback_for_logical_path() {
        let (_dir, root) = test_root();
        write_file(&root, "Build/game.wasm.br", b"compressed-wasm");

        let resolved = resolve(&root, "/Build/game.wasm", &index_files())
            .await
            .unwrap();
        assert_eq!(resolved.encoding, Some(ContentCoding::Brotli));
        assert_eq!(resolved.content_type, "application/wasm");
        assert_eq!(resolved.size, b"compressed-wasm".len() as u64);
        assert!(resolved.path.ends_with("Build/game.wasm.br"));
    }

    #[tokio::test]
    async fn test_gzip_fallback_when_no_brotli() {
        let (_dir, root) = test_root();
        write_file(&root, "main.js.gz", b"gzipped");

        let resolved = resolve(&root, "/main.js", &index_files()).await.unwrap();
        assert_eq!(resolved.encoding, Some(ContentCoding::Gzip));
        assert_eq!(resolved.content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_exact_match_beats_compressed_sibling() {
        let (_dir, root) = test_root();
        write_file(&root, "index.html", b"plain");
        write_file(&root, "index.html.gz", b"gz");

        let resolved = resolve(&root, "/index.html", &index_files())
            .await
            .unwrap();
        assert_eq!(resolved.encoding, None);
        assert_eq!(resolved.size, b"plain".len() as u64);
        assert!(resolved.path.ends_with("index.html"));
    }

    #[tokio::test]
    async fn test_direct_compressed_request() {
        let (_dir, root) = test_root();
        write_file(&root, "game.data", b"plain-data");
        write_file(&root, "game.data.br", b"br-data");

        let resolved = resolve(&root, "/game.data.br", &index_files())
            .await
            .unwrap();
        assert_eq!(resolved.encoding, Some(ContentCoding::Brotli));
        assert_eq!(resolved.content_type, "application/octet-stream");
        assert_eq!(resolved.size, b"br-data".len() as u64);
    }

    #[tokio::test]
    async fn test_brotli_preferred_over_gzip() {
        let (_dir, root) = test_root();
        write_file(&root, "game.wasm.br", b"br");
        write_file(&root, "game.wasm.gz", b"gz");

        let resolved = resolve(&root, "/game.wasm", &index_files()).await.unwrap();
        assert_eq!(resolved.encoding, Some(ContentCoding::Brotli));
    }

    #[tokio::test]
    async fn test_missing_path_is_none() {
        let (_dir, root) = test_root();
        assert!(resolve(&root, "/missing.data", &index_files()).await.is_none());
    }

    #[tokio::test]
    async fn test_directory_resolves_index_file() {
        let (_dir, root) = test_root();
        write_file(&root, "index.html", b"<html></html>");

        let resolved = resolve(&root, "/", &index_files()).await.unwrap();
        assert_eq!(resolved.encoding, None);
        assert_eq!(resolved.content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_directory_without_index_is_none() {
        let (_dir, root) = test_root();
        std::fs::create_dir(root.join("Build")).unwrap();
        assert!(resolve(&root, "/Build/", &index_files()).await.is_none());
    }

    #[tokio::test]
    async fn test_traversal_is_neutralized() {
        let (_dir, root) = test_root();
        write_file(&root, "index.html", b"safe");

        assert!(resolve(&root, "/../../etc/passwd", &index_files())
            .await
            .is_none());
    }

    #[test]
    fn test_coding_from_path() {
        assert_eq!(ContentCoding::from_path("a.wasm.br"), Some(ContentCoding::Brotli));
        assert_eq!(ContentCoding::from_path("a.js.gz"), Some(ContentCoding::Gzip));
        assert_eq!(ContentCoding::from_path("a.wasm"), None);
    }
}
