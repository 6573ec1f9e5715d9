//! Shared utility functions.

const ELLIPSIS: &str = "...";

/// Single-line preview of `text` for log lines and error details.
///
/// Whitespace runs (including newlines) collapse to one space. When the
/// result exceeds `max_bytes` it is cut on a character boundary and an
/// ellipsis is appended, so the output is at most `max_bytes + 3` bytes.
pub fn preview(text: &str, max_bytes: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.len() <= max_bytes {
        return flat;
    }
    let mut end = max_bytes;
    while !flat.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", flat[..end].trim_end(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_flattened_only() {
        assert_eq!(preview("  Know\n\nthyself.  ", 80), "Know thyself.");
        assert_eq!(preview("", 10), "");
    }

    #[test]
    fn test_long_text_gets_ellipsis() {
        assert_eq!(
            preview("The unexamined life is not worth living", 15),
            "The unexamined..."
        );
    }

    #[test]
    fn test_cut_respects_char_boundaries() {
        // Each CJK character is 3 bytes
        assert_eq!(preview("己所不欲勿施於人", 7), "己所...");
        assert_eq!(preview("己所不欲勿施於人", 9), "己所不...");
    }
}
