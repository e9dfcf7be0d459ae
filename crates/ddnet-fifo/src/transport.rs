use crate::error::FifoError;

/// Size of the fixed read buffer. POSIX reads at most `READ_CHUNK - 1` bytes
/// per poll; Windows uses it for both pipe buffer directions.
pub const READ_CHUNK: usize = 8192;

/// A named, non-blocking inbound byte channel.
///
/// One implementation per platform; the line handling in [`crate::Fifo`] is
/// shared. No method may block the calling thread.
pub trait PipeTransport: Sized {
    /// Provision the OS object for `path` and open it for non-blocking reads.
    fn create(path: &str) -> Result<Self, FifoError>;

    /// Deliver whatever is currently readable to `on_chunk`.
    ///
    /// Returns `Ok(())` without calling `on_chunk` when there is nothing to
    /// read or no writer is connected yet.
    fn poll(&mut self, on_chunk: &mut dyn FnMut(&[u8])) -> Result<(), FifoError>;

    /// Release the OS object.
    fn shutdown(self);

    /// Path or pipe name, for log lines.
    fn describe(&self) -> &str;
}

#[cfg(unix)]
pub type PlatformTransport = crate::unix::UnixFifo;

#[cfg(windows)]
pub type PlatformTransport = crate::windows::WindowsPipe;
