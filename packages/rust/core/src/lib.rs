//! Chat orchestration for deskbot.
//!
//! Ties the help-center client and the completion client together into one
//! question-answering turn: query derivation, translation, intent
//! classification, and response composition.

pub mod composer;
pub mod endpoint;
pub mod intent;
pub mod pipeline;
pub mod query;
pub mod translator;

#[cfg(test)]
mod testing;

pub use endpoint::{EndpointResponse, handle_chat};
pub use pipeline::{ChatPipeline, ProgressReporter, SilentProgress};
