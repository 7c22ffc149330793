//! Core trait abstractions for the job extraction library.
//!
//! These are the seams where applications plug in a language model,
//! a page fetcher, a remote scrape worker and persistence.

pub mod ai;
pub mod fetcher;
pub mod remote;
pub mod store;
