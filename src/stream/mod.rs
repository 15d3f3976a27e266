//! Seek-aware streams over the engine's one-shot pull streams.

mod bridge;
mod byte_stream;
mod lob;
mod memory;
mod pool;
mod text;

pub use bridge::StreamBridge;
pub use byte_stream::ByteStream;
pub use lob::{Blob, Clob};
pub(crate) use lob::{byte_source, char_source};
pub use memory::MemorySource;
pub use pool::{BufferPool, PooledBuffer, BYTE_POOL, CHAR_POOL};
pub use text::TextReader;
