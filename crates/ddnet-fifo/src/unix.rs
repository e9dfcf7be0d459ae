// POSIX FIFO transport.

use std::ffi::CString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::FifoError;
use crate::transport::{PipeTransport, READ_CHUNK};

/// FIFO special file opened read-only and non-blocking.
pub struct UnixFifo {
    file: File,
    path: PathBuf,
    name: String,
    buf: Box<[u8; READ_CHUNK]>,
}

impl UnixFifo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn mkfifo(path: &Path) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    let ret = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

fn is_fifo(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_fifo())
        .unwrap_or(false)
}

impl PipeTransport for UnixFifo {
    fn create(name: &str) -> Result<Self, FifoError> {
        if name.contains('\0') {
            return Err(FifoError::InvalidPath {
                path: name.to_string(),
            });
        }
        let path = PathBuf::from(name);

        // An existing entry makes this fail with EEXIST; the type check below
        // decides what to do with it.
        let first = mkfifo(&path);

        if !is_fifo(&path) {
            if path.symlink_metadata().is_ok() {
                warn!("'{}' is not a fifo, removing", name);
                if let Err(e) = fs::remove_file(&path) {
                    debug!("remove '{}': {}", name, e);
                }
                if let Err(e) = mkfifo(&path) {
                    debug!("mkfifo '{}': {}", name, e);
                }
                if !is_fifo(&path) {
                    return Err(FifoError::NotAFifo {
                        path: name.to_string(),
                    });
                }
            } else {
                return Err(FifoError::Create {
                    path: name.to_string(),
                    source: first
                        .err()
                        .unwrap_or_else(|| io::Error::from(io::ErrorKind::NotFound)),
                });
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .map_err(|source| FifoError::Open {
                path: name.to_string(),
                source,
            })?;

        Ok(Self {
            file,
            path,
            name: name.to_string(),
            buf: Box::new([0; READ_CHUNK]),
        })
    }

    fn poll(&mut self, on_chunk: &mut dyn FnMut(&[u8])) -> Result<(), FifoError> {
        // One bounded read per poll; leftovers wait for the next frame.
        match self.file.read(&mut self.buf[..READ_CHUNK - 1]) {
            Ok(0) => Ok(()),
            Ok(n) => {
                on_chunk(&self.buf[..n]);
                Ok(())
            }
            Err(e)
                if e.kind() == io::ErrorKind::WouldBlock
                    || e.kind() == io::ErrorKind::Interrupted =>
            {
                Ok(())
            }
            Err(source) => Err(FifoError::Read {
                path: self.name.clone(),
                source,
            }),
        }
    }

    fn shutdown(self) {
        let Self { file, path, name, .. } = self;
        drop(file);
        if let Err(e) = fs::remove_file(&path) {
            debug!("remove fifo '{}': {}", name, e);
        }
    }

    fn describe(&self) -> &str {
        &self.name
    }
}
