//! Detection of URLs that are local to this application.

/// Returns true if `url` is an app-relative path rather than an external address.
///
/// Matches `/path` and `~/path` forms. Protocol-relative (`//host`) and
/// backslash tricks (`/\host`) are not local: browsers resolve them to other hosts.
/// Absolute URLs are never local.
///
/// # Examples
///
/// ```ignore
/// assert!(is_local_url("/admin/edit"));
/// assert!(is_local_url("~/links"));
/// assert!(!is_local_url("//evil.com/x"));
/// assert!(!is_local_url("https://example.com/"));
/// ```
pub fn is_local_url(url: &str) -> bool {
    if url.is_empty() || url.chars().any(char::is_control) {
        return false;
    }

    let rest = if let Some(rest) = url.strip_prefix("~/") {
        rest
    } else if let Some(rest) = url.strip_prefix('/') {
        rest
    } else {
        return false;
    };

    !rest.starts_with('/') && !rest.starts_with('\\')
}
