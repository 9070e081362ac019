//! Domain model for the Session & Game Engine context.

pub mod commands;
pub mod config;
pub mod sampling;
pub mod schedule;
pub mod session;
pub mod values;
