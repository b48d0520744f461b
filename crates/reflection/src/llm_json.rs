//! Extraction of JSON objects from model replies.
//!
//! Models are asked for bare JSON but routinely wrap it in prose or code
//! fences. Callers slice out the outermost object and parse that; anything
//! that still fails to parse takes the caller's fallback path.

/// Slice the outermost `{...}` object out of a model reply.
pub(crate) fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        assert_eq!(extract_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_object_in_code_fence() {
        let reply = "Here you go:\n```json\n{\"a\": 1}\n```\nanything else?";
        assert_eq!(extract_object(reply), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_no_object() {
        assert_eq!(extract_object("no json here"), None);
        assert_eq!(extract_object("} backwards {"), None);
        assert_eq!(extract_object(""), None);
    }
}
