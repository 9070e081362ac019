//! Application services for the Session & Game Engine context.

pub mod command_handlers;
pub mod query_handlers;
pub mod store;
