use crate::catalog::Operation;
use crate::config::Settings;

/// A logical generation request, independent of any provider.
///
/// `system_instruction` is already resolved (override, else the operation's
/// default); drivers treat it as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub operation: Operation,
    pub system_instruction: String,
    pub user_prompt: String,
}

impl GenerationRequest {
    pub fn new(
        operation: Operation,
        system_instruction: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            system_instruction: system_instruction.into(),
            user_prompt: user_prompt.into(),
        }
    }

    /// Build a request from the catalog and a settings snapshot.
    pub fn for_operation(
        operation: Operation,
        input: &str,
        tone: Option<&str>,
        settings: &Settings,
    ) -> Self {
        Self {
            operation,
            system_instruction: settings.instruction_for(operation),
            user_prompt: operation.render_prompt(input, tone),
        }
    }
}
