//! # Types Module
//!
//! Request-scoped values that flow through the dispatcher. None of them is
//! persisted; each lives for one call.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`GenerationRequest`] | Operation, resolved instruction and rendered prompt |
//! | [`ProviderSelection`] | Provider, model, credential and relay snapshot |
//! | [`GenerationResult`] | Ordered, non-empty list of variants |
//! | [`ProviderId`] | Backend identity |
//! | [`Route`] | Driver a selection dispatches to |

pub mod provider;
pub mod request;
pub mod result;
pub mod selection;

pub use provider::{ProviderId, Route};
pub use request::GenerationRequest;
pub use result::GenerationResult;
pub use selection::ProviderSelection;
