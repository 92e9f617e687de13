//! Real-time support chat: a per-user socket registry and the relay that
//! turns one inbound question into one answered, recorded exchange.
//!
//! Two delivery paths share the same responder and store:
//! - socket path: frames arrive on `/ws`, answers are pushed back to the
//!   user's registered connection, failures are logged and dropped
//! - synchronous path: `POST /api/support/faq` answers in the same call and
//!   surfaces failures to the caller

pub mod connection;
pub mod handlers;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod responder;
pub mod store;
