//! Segment access: the capability traits scoring depends on, the per-segment
//! document binding, and an in-memory segment implementation.

pub mod binding;
pub mod memory;
pub mod traits;

pub use self::binding::{BindingState, DocumentBinding};
pub use self::memory::{MemorySegment, MemorySegmentBuilder};
pub use self::traits::{BinaryDocValues, SegmentReader};
