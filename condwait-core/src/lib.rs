pub mod event;
pub mod memory;
pub mod source;
pub mod stream_id;

pub use event::{Event, EventType};
pub use memory::InMemoryEventSource;
pub use source::EventSource;
pub use stream_id::StreamId;
