//! Session store implementations

mod couch;
mod traits;

pub use couch::CouchStore;
pub use traits::SessionStore;
