//! Pipeline state machine, derived-state reconciler, and the helpers behind
//! every simulated RAG stage.
//!
//! Front ends drive a [`session::Session`]: they navigate and change
//! parameters, then call [`session::Session::reconcile`] and execute any
//! [`generation::GenerationRequest`] it hands back.

pub mod catalog;
pub mod chunking;
pub mod generation;
pub mod pipeline;
pub mod retrieval;
pub mod session;

pub use generation::{GenerationRequest, Generator, OpenRouterGenerator, generate_answer};
pub use session::Session;
