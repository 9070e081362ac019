//! Odyssey — chat transport over HTTP.
//!
//! A chat front end (bot webhook, web chat, ...) forwards each player's
//! messages here and relays the rendered `reply` text back.

pub mod config;
pub mod error;
pub mod presenter;
pub mod routes;
pub mod state;
