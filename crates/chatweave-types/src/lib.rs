pub mod adapter;
pub mod entry;
pub mod merge;
pub mod message;

pub use adapter::*;
pub use entry::*;
pub use merge::*;
pub use message::*;
