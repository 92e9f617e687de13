// Employee support: policy documents and reminders.
// The FAQ endpoint and chat history live in `crate::chat`.

pub mod handlers;
pub mod repository;
