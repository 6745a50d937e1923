//! Object path helpers

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("file name pattern is valid"));

/// Drop every character outside `[A-Za-z0-9._-]`
pub fn sanitize_file_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "").into_owned()
}

/// `<prefix>/<owner>/<millis>-<sanitized name>`
pub fn object_path(prefix: &str, owner_id: &str, millis: i64, file_name: &str) -> String {
    format!(
        "{}/{}/{}-{}",
        prefix.trim_matches('/'),
        owner_id,
        millis,
        sanitize_file_name(file_name)
    )
}

/// Recover the object path from a public URL: everything after `/<bucket>/`
pub fn path_from_public_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/{}/", bucket);
    let (_, tail) = url.split_once(&marker)?;
    let tail = tail.split(['?', '#']).next().unwrap_or(tail);
    if tail.is_empty() {
        return None;
    }
    Some(
        urlencoding::decode(tail)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| tail.to_string()),
    )
}

/// MIME type for an object, judged by its file extension
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
