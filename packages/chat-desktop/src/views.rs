//! View modules

pub mod chat;
