//! Job store implementations.
//!
//! Available backends:
//! - `MemoryJobStore` - In-memory storage (always available)

pub mod memory;

pub use memory::MemoryJobStore;
