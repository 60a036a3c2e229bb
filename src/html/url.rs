//! Small URL helpers for page locations

/// Value of a query string parameter in `location`, percent-decoded
///
/// A parameter given without `=` has the empty string as its value.
pub fn query_param(location: &str, name: &str) -> Option<String> {
    let query = location.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| {
            let value = value.replace('+', " ");
            urlencoding::decode(&value)
                .map(|decoded| decoded.into_owned())
                .unwrap_or(value)
        })
}

/// Whether `url` may be used as a link target: a same-site path
/// (`/movies`, not `//host`) or an absolute `http`/`https` URL
pub fn is_safe_redirect(url: &str) -> bool {
    if url.chars().any(char::is_control) {
        return false;
    }
    if let Some(path) = url.strip_prefix('/') {
        return !path.starts_with(['/', '\\']);
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    (scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")) && !rest.is_empty()
}

/// Strips scheme and host, leaving path, query and fragment
pub fn to_relative_url(url: &str) -> String {
    let rest = if let Some((_, after_scheme)) = url.split_once("://") {
        after_scheme
    } else if let Some(after_slashes) = url.strip_prefix("//") {
        after_slashes
    } else {
        return url.to_string();
    };

    match rest.find(['/', '?', '#']) {
        Some(start) if rest[start..].starts_with('/') => rest[start..].to_string(),
        Some(start) => format!("/{}", &rest[start..]),
        None => "/".to_string(),
    }
}
