//! Error classification by message content
//!
//! Categories are checked in declaration order; the first match wins.

use crate::domain::value_objects::ErrorCategory;

const RULES: &[(ErrorCategory, &[&str])] = &[
    (
        ErrorCategory::Network,
        &[
            "network",
            "fetch",
            "timeout",
            "timed out",
            "connection",
            "failed to send",
        ],
    ),
    (
        ErrorCategory::Auth,
        &["unauthorized", "jwt", "token", "auth", "permission", "forbidden"],
    ),
    (
        ErrorCategory::Database,
        &[
            "database",
            "duplicate key",
            "violates",
            "relation",
            "sql",
            "constraint",
            "repository",
        ],
    ),
    (
        ErrorCategory::Validation,
        &["invalid", "required", "validation", "must be"],
    ),
];

pub fn classify(message: &str) -> ErrorCategory {
    let lowered = message.to_lowercase();
    RULES
        .iter()
        .find(|(_, needles)| needles.iter().any(|n| lowered.contains(n)))
        .map(|(category, _)| *category)
        .unwrap_or(ErrorCategory::Unknown)
}

/// Arabic message for a raw error text
pub fn user_message(message: &str) -> &'static str {
    classify(message).user_message()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(classify("Failed to fetch"), ErrorCategory::Network);
        assert_eq!(classify("request timed out"), ErrorCategory::Network);
        assert_eq!(classify("JWT expired"), ErrorCategory::Auth);
        assert_eq!(
            classify("duplicate key value violates unique constraint"),
            ErrorCategory::Database
        );
        assert_eq!(classify("phone must be a Saudi mobile"), ErrorCategory::Validation);
        assert_eq!(classify("something odd"), ErrorCategory::Unknown);
    }

    #[test]
    fn test_order_prefers_network() {
        assert_eq!(
            classify("database connection refused"),
            ErrorCategory::Network
        );
    }

    #[test]
    fn test_user_message_is_arabic() {
        assert_eq!(
            user_message("???"),
            "حدث خطأ غير متوقع. يرجى المحاولة مرة أخرى"
        );
    }
}
