//! Identifier sanitizing: the sole injection defense for user-supplied names.
//! Values never come through here; they are always bound as parameters.

/// Strip every character outside `[A-Za-z0-9_]`. Idempotent; clean input passes
/// through unchanged. Only for user-supplied identifiers (table, column, sort
/// key) — never for trusted backend-generated strings, where stripping would be
/// lossy.
pub fn sanitize(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Sanitize, then wrap in PostgreSQL identifier quoting so names colliding with
/// reserved words stay valid.
pub fn quote_ident(identifier: &str) -> String {
    format!("\"{}\"", sanitize(identifier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_everything_outside_whitelist() {
        assert_eq!(sanitize("users; DROP TABLE users--"), "usersDROPTABLEusers");
        assert_eq!(sanitize("col\"name'`)"), "colname");
        assert_eq!(sanitize("a b\tc\nd"), "abcd");
    }

    #[test]
    fn clean_input_is_identity() {
        for s in ["users", "user_id", "Col9", "_private", "9lives"] {
            assert_eq!(sanitize(s), s);
        }
    }

    #[test]
    fn idempotent() {
        let once = sanitize("we!ird–name");
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn output_only_contains_whitelist_chars() {
        let out = sanitize("πcol-umn.name?&=%");
        assert!(out.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }

    #[test]
    fn quoting_wraps_sanitized_name() {
        assert_eq!(quote_ident("order"), "\"order\"");
        assert_eq!(quote_ident("or\"der"), "\"order\"");
    }
}
