//! Odyssey Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the session
//! engine, the content sources and the transport depend on. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod content;
pub mod error;
pub mod player;
pub mod repository;
pub mod rng;
