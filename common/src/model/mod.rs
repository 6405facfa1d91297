//! Domain models shared across the workspace

pub mod account;
