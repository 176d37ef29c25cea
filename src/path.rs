//! Dot-path utilities and token classifiers.
//!
//! Relation paths are dot-separated chains of alphabetic identifiers
//! (`profile.address.city`). Where-tree leaves additionally come in two
//! sigil-prefixed forms: operator tokens (`$eq`) and parameter references
//! (`:active`).

/// Sigil prefixing operator tokens in a where-tree.
pub const OPERATOR_SIGIL: char = '$';

/// Sigil prefixing parameter references in a where-tree.
pub const PARAM_SIGIL: char = ':';

/// Number of dot-separated segments in a path.
pub fn depth(path: &str) -> usize {
    path.split('.').count()
}

/// The path with its last segment removed, or `None` for a single segment.
pub fn parent(path: &str) -> Option<&str> {
    path.rfind('.').map(|idx| &path[..idx])
}

/// The final segment of a path.
pub fn last_segment(path: &str) -> &str {
    match path.rfind('.') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// True iff every dot-separated segment is non-empty and alphabetic.
pub fn is_dot_path(s: &str) -> bool {
    !s.is_empty()
        && s.split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphabetic()))
}

/// True for `$name` tokens: operator sigil plus a non-empty alphabetic tail.
pub fn is_operator_token(s: &str) -> bool {
    sigil_token(s, OPERATOR_SIGIL)
}

/// True for `:name` tokens: parameter sigil plus a non-empty alphabetic tail.
pub fn is_param_token(s: &str) -> bool {
    sigil_token(s, PARAM_SIGIL)
}

fn sigil_token(s: &str, sigil: char) -> bool {
    let mut chars = s.chars();
    if chars.next() != Some(sigil) {
        return false;
    }
    let tail = chars.as_str();
    !tail.is_empty() && tail.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(depth("a"), 1);
        assert_eq!(depth("a.b"), 2);
        assert_eq!(depth("a.b.c"), 3);
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("a"), None);
        assert_eq!(parent("a.b"), Some("a"));
        assert_eq!(parent("a.b.c"), Some("a.b"));
    }

    #[test]
    fn test_last_segment() {
        assert_eq!(last_segment("a"), "a");
        assert_eq!(last_segment("a.b"), "b");
        assert_eq!(last_segment("a.b.c"), "c");
    }

    #[test]
    fn test_is_dot_path() {
        assert!(is_dot_path("status"));
        assert!(is_dot_path("profile.address.city"));
        assert!(!is_dot_path(""));
        assert!(!is_dot_path("a..b"));
        assert!(!is_dot_path(".a"));
        assert!(!is_dot_path("a."));
        assert!(!is_dot_path("a.b1"));
        assert!(!is_dot_path("a b"));
        assert!(!is_dot_path("$eq"));
        assert!(!is_dot_path(":active"));
    }

    #[test]
    fn test_operator_token() {
        assert!(is_operator_token("$eq"));
        assert!(is_operator_token("$isnotnull"));
        assert!(!is_operator_token("$"));
        assert!(!is_operator_token("$e1"));
        assert!(!is_operator_token("eq"));
        assert!(!is_operator_token(":eq"));
    }

    #[test]
    fn test_param_token() {
        assert!(is_param_token(":active"));
        assert!(!is_param_token(":"));
        assert!(!is_param_token(":a1"));
        assert!(!is_param_token("active"));
        assert!(!is_param_token("$active"));
    }

    #[test]
    fn test_classes_are_mutually_exclusive() {
        for token in ["$eq", ":active", "a.b", "status"] {
            let classes = [
                is_operator_token(token),
                is_dot_path(token),
                is_param_token(token),
            ];
            assert_eq!(classes.iter().filter(|c| **c).count(), 1, "{token}");
        }
    }
}
