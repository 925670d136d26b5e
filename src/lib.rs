// SPDX-License-Identifier: MIT

//! Ordo: Conversational AI File Finder & Organizer
//!
//! A command-line assistant that turns natural-language requests into
//! filesystem operations. Intent parsing and tool selection are delegated
//! to the Gemini API via its function-calling protocol; this crate owns
//! the tool implementations, the wire client, and the session loop.

pub mod config;
pub mod error;
pub mod finder;
pub mod gemini;
pub mod organizer;
pub mod session;
pub mod tools;

pub use config::AppConfig;
pub use error::{OrdoError, Result};
