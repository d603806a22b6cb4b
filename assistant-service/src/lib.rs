//! assistant-service: HTTP backend for the shop assistant.
//!
//! Relays chat messages to a completion API, dispatches push
//! notifications through FCM and OneSignal, and proxies image-edit
//! predictions to Replicate.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
