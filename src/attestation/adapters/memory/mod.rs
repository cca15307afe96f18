//! In-memory adapters for scheduling and completion tests.

mod dispatcher;
mod registry;

pub use dispatcher::RecordingDispatcher;
pub use registry::InMemoryRegistry;
