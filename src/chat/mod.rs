//! Chat subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/chat {persona, message, history}
//!     → handler.rs (validate persona shape)
//!     → conversation.rs (append user message, bounded history)
//!     → provider.rs (ResponseProvider::respond)
//!     → {reply, messages}
//! ```
//!
//! # Design Decisions
//! - Stateless: the client holds the transcript, nothing is persisted
//! - Replies come from a pluggable `ResponseProvider`; the canned responder
//!   is the only implementation until a real model backend exists

pub mod conversation;
pub mod handler;
pub mod provider;

pub use conversation::Conversation;
pub use handler::{chat_handler, ChatState};
pub use provider::{CannedResponder, ChatError, ChatMessage, Persona, ResponseProvider, Role};
