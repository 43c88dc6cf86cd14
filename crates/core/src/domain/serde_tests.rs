#[cfg(test)]
mod tests {
    use crate::domain::account::{Billing, Plan, User};
    use crate::domain::error::{AppError, ErrorCode};
    use crate::domain::rewrite::{RewriteResult, RewriteSource};
    use crate::domain::style::{map_style, Style};

    #[test]
    fn test_style_serialization() {
        assert_eq!(serde_json::to_string(&Style::Fluent).unwrap(), "\"fluent\"");
        assert_eq!(serde_json::to_string(&Style::Formal).unwrap(), "\"formal\"");
        assert_eq!(
            serde_json::from_str::<Style>("\"creative\"").unwrap(),
            Style::Creative
        );
    }

    #[test]
    fn test_style_mapping_serialization() {
        let json = serde_json::to_value(map_style("simple")).unwrap();
        assert_eq!(json["readability"], "High School");
        assert_eq!(json["purpose"], "General Writing");
        assert_eq!(json["strength"], "More Human");
    }

    #[test]
    fn test_rewrite_result_serialization() {
        let r = RewriteResult::new("hello", RewriteSource::Fallback);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"source\":\"fallback\""));
        assert!(json.contains("\"text\":\"hello\""));
    }

    #[test]
    fn test_error_code_serialization() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::EmptyInput).unwrap(),
            "\"E_EMPTY_INPUT\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::NoCredits).unwrap(),
            "\"E_NO_CREDITS\""
        );
        assert_eq!(
            serde_json::to_string(&ErrorCode::NotLoggedIn).unwrap(),
            "\"E_NOT_LOGGED_IN\""
        );
    }

    #[test]
    fn test_app_error_serialization() {
        let err = AppError::empty_input();
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("E_EMPTY_INPUT"));
        assert!(json.contains("recoverable"));
        assert_eq!(
            err.to_string(),
            "[E_EMPTY_INPUT] Please enter some text to rewrite."
        );
    }

    #[test]
    fn test_user_uses_camel_case() {
        let user = User {
            id: "1".to_string(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            plan: Plan::Enterprise,
            credits: 510,
            created_at: "2025-01-15T10:30:00Z".to_string(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["createdAt"], "2025-01-15T10:30:00Z");
        assert_eq!(json["plan"], "enterprise");

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_billing_serialization() {
        assert_eq!(
            serde_json::to_string(&Billing::Annual).unwrap(),
            "\"annual\""
        );
    }
}
