use crate::transport::TransportError;
use thiserror::Error;

/// Structured error context for configuration problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Settings key that caused the error (e.g., "provider", "proxyUrl")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected values, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "settings_loader", "catalog")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for generation and configuration.
///
/// The three call-time categories map one-to-one onto how a call can fail:
/// no usable credential, endpoint unreachable, endpoint said no.
#[derive(Debug, Error)]
pub enum Error {
    /// No usable credential for the selected provider. Raised before any network call.
    #[error("{message}")]
    CredentialMissing { provider: String, message: String },

    /// The request never reached the endpoint.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The endpoint answered, but with a non-success status or an unusable payload.
    #[error("{message}")]
    ProviderRejected {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn credential_missing(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::CredentialMissing {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn rejected(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Error::ProviderRejected {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Upstream HTTP status for rejections that carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ProviderRejected { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_credential_missing(&self) -> bool {
        matches!(self, Error::CredentialMissing { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::ProviderRejected { .. })
    }
}
