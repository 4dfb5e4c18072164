//! Backend for an AI children's story generator
//!
//! Turns a (name, character, topic) prompt into a short story with an LLM,
//! optionally illustrates it, re-hosts the illustration on a CDN, and keeps
//! generated stories in a database behind a small JSON API.

pub mod ai;
pub mod api;
pub mod app;
pub mod cdn;
pub mod error;
pub mod generator;
pub mod hosting;
pub mod models;
pub mod prompts;
pub mod store;

pub use error::{Error, Result};
