//! # prompt-forge
//!
//! Provider-agnostic text transformation runtime. A fixed set of operations
//! (rephrase, improve, change tone, summarize, expand) is sent to one of
//! several interchangeable AI backends, and the heterogeneous replies come
//! back as one uniform, ordered list of variants.
//!
//! ## Backends
//!
//! - **Gemini** (native): structured-output request with an array-of-strings
//!   schema, key passed as a query parameter.
//! - **OpenAI, Groq, OpenRouter**: the chat-completions wire format, bearer
//!   authentication.
//! - **Relay**: a user-operated endpoint that holds the real key and takes a
//!   single combined prompt. Only the Gemini provider routes through it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prompt_forge::{Dispatcher, Operation, Settings};
//!
//! #[tokio::main]
//! async fn main() -> prompt_forge::Result<()> {
//!     let dispatcher = Dispatcher::new()?;
//!     let settings = Settings::load("settings.json")?;
//!
//!     let variants = dispatcher
//!         .generate_with(&settings, Operation::Tone, "see you tomorrow", Some("Friendly"))
//!         .await?;
//!     for v in &variants {
//!         println!("- {v}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Dispatcher, builder and connection probing |
//! | [`drivers`] | One driver per wire protocol |
//! | [`normalize`] | Raw reply text to variants |
//! | [`transport`] | Shared HTTP client |
//! | [`catalog`] | Built-in operations and prompt templates |
//! | [`config`] | Settings document and snapshots |
//! | [`types`] | Request-scoped values |

pub mod catalog;
pub mod client;
pub mod config;
pub mod drivers;
pub mod normalize;
pub mod transport;
pub mod types;

pub use catalog::Operation;
pub use client::{Dispatcher, DispatcherBuilder};
pub use config::{ConfigurationProvider, Settings};
pub use normalize::DecodeOutcome;
pub use transport::TransportConfig;
pub use types::{GenerationRequest, GenerationResult, ProviderId, ProviderSelection, Route};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
