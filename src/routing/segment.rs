//! Path segmentation.
//!
//! # Responsibilities
//! - Split a path on `/`
//! - Drop empty segments (leading, trailing and repeated slashes)
//! - Recognize parameter segments (`:name`)
//!
//! # Design Decisions
//! - Total: every input, including `""`, yields a (possibly empty) list
//! - Borrowed output, no allocation per segment

/// Marks a pattern segment as a parameter.
pub const PARAM_SIGIL: char = ':';

/// Split a path into its non-empty `/`-delimited segments.
pub fn segment(path: &str) -> Vec<&str> {
    segments(path).collect()
}

/// Lazy form of [`segment`].
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Returns the parameter name if `segment` starts with [`PARAM_SIGIL`].
///
/// A bare sigil is a parameter with an empty name.
pub fn param_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(PARAM_SIGIL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_drops_empty() {
        assert_eq!(segment("/a/"), vec!["a"]);
        assert_eq!(segment("/a"), vec!["a"]);
        assert_eq!(segment("//a"), vec!["a"]);
        assert_eq!(segment("a//b///c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_segment_empty_inputs() {
        assert!(segment("").is_empty());
        assert!(segment("/").is_empty());
        assert!(segment("////").is_empty());
    }

    #[test]
    fn test_param_name() {
        assert_eq!(param_name(":id"), Some("id"));
        assert_eq!(param_name(":"), Some(""));
        assert_eq!(param_name("users"), None);
        // Only the first character counts
        assert_eq!(param_name("a:b"), None);
    }
}
