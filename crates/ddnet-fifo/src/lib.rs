// Console input FIFO
//
// Lets an external process feed newline-separated console commands into the
// client through a POSIX FIFO or a Windows named pipe. The host polls the
// channel once per frame; every received line is executed through a
// CommandSink tagged with the channel's origin flag.

pub mod error;
pub mod fifo;
pub mod lines;
pub mod transport;

#[cfg(unix)]
pub mod unix;
#[cfg(windows)]
pub mod windows;

pub use error::FifoError;
pub use fifo::Fifo;
pub use lines::split_lines;
pub use transport::{PipeTransport, PlatformTransport, READ_CHUNK};
