//! Gift suggestions from a chat completion endpoint.
//!
//! A [`Profile`] is rendered into a prompt, sent to the configured endpoint by a
//! [`Recommender`], and the reply text is parsed into [`GiftSuggestion`]s.

pub mod config;
pub mod error;
pub mod generator;
pub mod gpt;
pub mod parser;
pub mod profile;
pub mod prompt;

pub use config::{EndpointConfig, SettingsStore, YamlSettingsStore};
pub use error::{GiftError, Result};
pub use generator::{GiftGenerator, Outcome};
pub use gpt::{GptClient, Recommender};
pub use parser::{parse_gifts, GiftSuggestion};
pub use profile::{Gender, Profile};
pub use prompt::{Prompt, SYSTEM_PROMPT};
