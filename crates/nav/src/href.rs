//! Link target resolution and active-link matching.

/// Resolve a node's `href` against the base URL and its parent's resolved href.
///
/// Rules, first match wins:
/// 1. fragments (`#…` or `…#`), `http…` and `mailto:` targets are used as-is;
/// 2. absolute paths (`/…`) are prefixed with `base_url`;
/// 3. anything else is joined to `parent_href` with a single `/`.
pub fn resolve_href(href: &str, base_url: Option<&str>, parent_href: Option<&str>) -> String {
    if href.starts_with('#')
        || href.ends_with('#')
        || href.starts_with("http")
        || href.starts_with("mailto:")
    {
        return href.to_string();
    }

    if href.starts_with('/') {
        return format!("{}{href}", base_url.unwrap_or_default());
    }

    let parent = parent_href.unwrap_or_default();
    if parent.ends_with('/') {
        format!("{parent}{href}")
    } else {
        format!("{parent}/{href}")
    }
}

/// Whether clicking a link to `href` should be suppressed.
pub fn is_placeholder(href: &str) -> bool {
    href.ends_with('#')
}

/// The path portion of a request URI (everything before `?`).
pub fn request_path(uri: &str) -> &str {
    uri.split_once('?').map_or(uri, |(path, _)| path)
}

/// Whether `href` points at the current request. An unknown request path
/// never matches.
pub fn is_active(href: &str, current_uri: Option<&str>) -> bool {
    current_uri.is_some_and(|uri| request_path(uri) == href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_joins_parent() {
        assert_eq!(resolve_href("add", Some("/home"), Some("/pages")), "/pages/add");
    }

    #[test]
    fn relative_avoids_double_slash() {
        assert_eq!(resolve_href("add", None, Some("/pages/")), "/pages/add");
    }

    #[test]
    fn relative_without_parent_is_rooted() {
        assert_eq!(resolve_href("add", None, None), "/add");
    }

    #[test]
    fn absolute_gets_base_url() {
        assert_eq!(resolve_href("/pages", Some("/home"), None), "/home/pages");
        assert_eq!(resolve_href("/pages", None, Some("/ignored")), "/pages");
    }

    #[test]
    fn verbatim_targets() {
        assert_eq!(resolve_href("http://x.com", Some("/home"), Some("/p")), "http://x.com");
        assert_eq!(resolve_href("https://x.com/a", None, None), "https://x.com/a");
        assert_eq!(resolve_href("mailto:a@b.c", Some("/home"), None), "mailto:a@b.c");
        assert_eq!(resolve_href("#", Some("/home"), Some("/p")), "#");
        assert_eq!(resolve_href("#top", None, Some("/p")), "#top");
    }

    #[test]
    fn trailing_fragment_wins_over_absolute() {
        assert_eq!(resolve_href("/pages#", Some("/home"), None), "/pages#");
    }

    #[test]
    fn placeholder_detection() {
        assert!(is_placeholder("#"));
        assert!(is_placeholder("/pages#"));
        assert!(!is_placeholder("#top"));
        assert!(!is_placeholder("/pages"));
    }

    #[test]
    fn request_path_strips_query() {
        assert_eq!(request_path("/pages?id=1"), "/pages");
        assert_eq!(request_path("/pages"), "/pages");
        assert_eq!(request_path("?q"), "");
    }

    #[test]
    fn active_matching() {
        assert!(is_active("/pages", Some("/pages?sort=asc")));
        assert!(!is_active("/pages", Some("/pages/add")));
        assert!(!is_active("/pages", None));
        assert!(!is_active("", None));
    }
}
