//! URL utilities for consistent endpoint construction
//!
//! The backend is addressed through a configured base URL that may or may not
//! carry a trailing slash, while callers write paths with a leading slash.
//! Everything here joins the two with exactly one slash.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use palaver::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000///"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with a single slash
///
/// # Examples
///
/// ```
/// use palaver::utils::url::join_endpoint;
///
/// assert_eq!(
///     join_endpoint("http://localhost:8000", "/project/conversations"),
///     "http://localhost:8000/project/conversations"
/// );
/// assert_eq!(
///     join_endpoint("http://localhost:8000/", "/logo?theme=dark"),
///     "http://localhost:8000/logo?theme=dark"
/// );
/// ```
pub fn join_endpoint(base_url: &str, path: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let path = path.trim_start_matches('/');
    format!("{}/{}", normalized_base, path)
}
