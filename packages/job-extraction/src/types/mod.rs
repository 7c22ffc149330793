//! Core types for the job extraction library.

pub mod config;
pub mod import;
pub mod job;
