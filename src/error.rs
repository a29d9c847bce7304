// Error module: every failure the tool can run into, tagged with how the
// caller is expected to react to it. Loading the config or templates and
// talking to the terminal are fatal; anything that happens while the menu
// is running (remote calls, writing templates) is recoverable and the user
// simply lands back on the main menu.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// How a failure should be handled by the menu loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Print a diagnostic and exit with status 1.
    Fatal,
    /// Print a diagnostic and return to the main menu.
    Recoverable,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("config file {} is not valid: {source}", path.display())]
    ConfigInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("accessToken missing in {}", path.display())]
    TokenMissing { path: PathBuf },

    #[error("templates file not found: {}", path.display())]
    TemplatesMissing { path: PathBuf },

    #[error("failed to read templates file {}: {source}", path.display())]
    TemplatesRead { path: PathBuf, source: io::Error },

    #[error("templates file {} is not valid: {source}", path.display())]
    TemplatesInvalid {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write templates file {}: {source}", path.display())]
    TemplatesWrite { path: PathBuf, source: io::Error },

    #[error("failed to encode templates: {0}")]
    TemplatesEncode(#[source] serde_json::Error),

    #[error("request to {method} failed: {source}")]
    Http {
        method: &'static str,
        source: reqwest::Error,
    },

    #[error("{method} answered with HTTP {status}")]
    HttpStatus {
        method: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{method} was rejected by Slack: {code}")]
    Api { method: &'static str, code: String },

    #[error("terminal prompt failed: {0}")]
    Prompt(#[from] io::Error),
}

impl AppError {
    pub fn severity(&self) -> Severity {
        match self {
            AppError::ConfigMissing { .. }
            | AppError::ConfigRead { .. }
            | AppError::ConfigInvalid { .. }
            | AppError::TokenMissing { .. }
            | AppError::TemplatesMissing { .. }
            | AppError::TemplatesRead { .. }
            | AppError::TemplatesInvalid { .. }
            | AppError::Prompt(_) => Severity::Fatal,
            AppError::TemplatesWrite { .. }
            | AppError::TemplatesEncode(_)
            | AppError::Http { .. }
            | AppError::HttpStatus { .. }
            | AppError::Api { .. } => Severity::Recoverable,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failures_are_fatal() {
        let path = PathBuf::from("templates.json");
        assert!(AppError::TemplatesMissing { path: path.clone() }.is_fatal());
        assert!(AppError::TokenMissing { path }.is_fatal());
        assert!(AppError::Prompt(io::Error::new(io::ErrorKind::Other, "no tty")).is_fatal());
    }

    #[test]
    fn session_failures_are_recoverable() {
        let write = AppError::TemplatesWrite {
            path: PathBuf::from("templates.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        assert_eq!(write.severity(), Severity::Recoverable);

        let api = AppError::Api {
            method: "users.profile.set",
            code: "invalid_auth".into(),
        };
        assert_eq!(api.severity(), Severity::Recoverable);
        assert_eq!(
            api.to_string(),
            "users.profile.set was rejected by Slack: invalid_auth"
        );
    }
}
