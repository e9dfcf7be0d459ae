// Shared types for the console input pipeline.
//
// Holds the config flag bitset used to tag where a command came from and the
// CommandSink contract that command producers (the input FIFO) dispatch into.

pub mod flags;
pub mod sink;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use flags::ConfigFlags;
pub use sink::{ClientId, CommandSink};
