use serde::Serialize;

use super::rewrite::EmptyInputError;

/// アプリケーション共通エラーコード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "E_EMPTY_INPUT")]
    EmptyInput,
    #[serde(rename = "E_NO_CREDITS")]
    NoCredits,
    #[serde(rename = "E_AUTH")]
    Auth,
    #[serde(rename = "E_NOT_LOGGED_IN")]
    NotLoggedIn,
    #[serde(rename = "E_INVALID_INPUT")]
    InvalidInput,
    #[serde(rename = "E_STORAGE")]
    Storage,
    #[serde(rename = "E_INTERNAL")]
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptyInput => "E_EMPTY_INPUT",
            ErrorCode::NoCredits => "E_NO_CREDITS",
            ErrorCode::Auth => "E_AUTH",
            ErrorCode::NotLoggedIn => "E_NOT_LOGGED_IN",
            ErrorCode::InvalidInput => "E_INVALID_INPUT",
            ErrorCode::Storage => "E_STORAGE",
            ErrorCode::Internal => "E_INTERNAL",
        }
    }
}

/// アプリケーションエラー（CLI / HTTP レスポンス兼用）
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub recoverable: bool,
}

impl AppError {
    pub fn empty_input() -> Self {
        Self {
            code: ErrorCode::EmptyInput,
            message: "Please enter some text to rewrite.".to_string(),
            recoverable: true,
        }
    }

    pub fn no_credits() -> Self {
        Self {
            code: ErrorCode::NoCredits,
            message: "No credits remaining. Please upgrade your plan to get more credits."
                .to_string(),
            recoverable: true,
        }
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Auth,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn not_logged_in() -> Self {
        Self {
            code: ErrorCode::NotLoggedIn,
            message: "Not logged in".to_string(),
            recoverable: true,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidInput,
            message: msg.into(),
            recoverable: true,
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Internal,
            message: msg.into(),
            recoverable: false,
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Storage,
            message: msg.into(),
            recoverable: false,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}

impl From<EmptyInputError> for AppError {
    fn from(_: EmptyInputError) -> Self {
        AppError::empty_input()
    }
}
