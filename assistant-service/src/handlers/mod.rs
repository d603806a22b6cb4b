//! HTTP handlers for assistant-service, one module per route.

pub mod chat;
pub mod health;
pub mod notify;
pub mod push;
pub mod replicate;
