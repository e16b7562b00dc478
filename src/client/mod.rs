//! Document-store client implementations

mod memory;

pub use memory::MemoryClient;

#[cfg(feature = "http-client")]
mod http;

#[cfg(feature = "http-client")]
pub use http::CouchClient;
