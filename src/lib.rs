// src/lib.rs — Library root for Professor

pub mod cli;
pub mod infra;
pub mod provider;
pub mod session;
