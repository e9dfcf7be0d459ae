// Windows named pipe transport.

use std::ptr;

use log::info;
use windows_sys::Win32::Foundation::{
    CloseHandle, ERROR_BAD_PIPE, ERROR_NO_DATA, ERROR_PIPE_CONNECTED, ERROR_PIPE_LISTENING,
    GetLastError, HANDLE, INVALID_HANDLE_VALUE,
};
use windows_sys::Win32::Storage::FileSystem::{PIPE_ACCESS_DUPLEX, ReadFile};
use windows_sys::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeW, DisconnectNamedPipe, NMPWAIT_USE_DEFAULT_WAIT,
    PIPE_NOWAIT, PIPE_READMODE_MESSAGE, PIPE_REJECT_REMOTE_CLIENTS, PIPE_TYPE_MESSAGE,
    PIPE_UNLIMITED_INSTANCES, PeekNamedPipe,
};

use crate::error::FifoError;
use crate::transport::{PipeTransport, READ_CHUNK};

const PIPE_PREFIX: &str = r"\\.\pipe\";

/// Full pipe name for a configured path.
pub fn pipe_name(path: &str) -> String {
    format!("{PIPE_PREFIX}{path}")
}

/// Server end of a non-blocking, message-mode named pipe.
pub struct WindowsPipe {
    handle: HANDLE,
    name: String,
}

impl PipeTransport for WindowsPipe {
    fn create(path: &str) -> Result<Self, FifoError> {
        if path.contains('\0') {
            return Err(FifoError::InvalidPath {
                path: path.to_string(),
            });
        }
        let name = pipe_name(path);
        let wide: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();

        // SAFETY: `wide` is NUL-terminated and outlives the call; a null
        // security descriptor selects the defaults.
        let handle = unsafe {
            CreateNamedPipeW(
                wide.as_ptr(),
                PIPE_ACCESS_DUPLEX,
                PIPE_TYPE_MESSAGE | PIPE_READMODE_MESSAGE | PIPE_NOWAIT | PIPE_REJECT_REMOTE_CLIENTS,
                PIPE_UNLIMITED_INSTANCES,
                READ_CHUNK as u32,
                READ_CHUNK as u32,
                NMPWAIT_USE_DEFAULT_WAIT,
                ptr::null(),
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            // SAFETY: no preconditions.
            let code = unsafe { GetLastError() };
            return Err(FifoError::os("create named pipe", &name, code));
        }

        info!("created named pipe '{}'", name);
        Ok(Self { handle, name })
    }

    fn poll(&mut self, on_chunk: &mut dyn FnMut(&[u8])) -> Result<(), FifoError> {
        // SAFETY: handle is a valid pipe handle until shutdown.
        if unsafe { ConnectNamedPipe(self.handle, ptr::null_mut()) } == 0 {
            // SAFETY: no preconditions.
            let code = unsafe { GetLastError() };
            match code {
                // waiting for a client to connect
                ERROR_PIPE_LISTENING => return Ok(()),
                // client went away; free the instance for the next one
                ERROR_NO_DATA => {
                    // SAFETY: as above.
                    unsafe { DisconnectNamedPipe(self.handle) };
                    return Ok(());
                }
                ERROR_PIPE_CONNECTED => {}
                _ => return Err(FifoError::os("connect named pipe", &self.name, code)),
            }
        }

        // Drain everything currently buffered.
        loop {
            let mut available: u32 = 0;
            // SAFETY: only the total-available out pointer is requested.
            let peeked = unsafe {
                PeekNamedPipe(
                    self.handle,
                    ptr::null_mut(),
                    0,
                    ptr::null_mut(),
                    &mut available,
                    ptr::null_mut(),
                )
            };
            if peeked == 0 {
                // SAFETY: no preconditions.
                let code = unsafe { GetLastError() };
                if code == ERROR_BAD_PIPE {
                    return Ok(());
                }
                return Err(FifoError::os("peek at pipe", &self.name, code));
            }
            if available == 0 {
                return Ok(());
            }

            let mut buf = vec![0u8; available as usize];
            let mut read: u32 = 0;
            // SAFETY: `buf` holds `available` writable bytes.
            let ok = unsafe {
                ReadFile(
                    self.handle,
                    buf.as_mut_ptr(),
                    available,
                    &mut read,
                    ptr::null_mut(),
                )
            };
            if ok == 0 {
                // SAFETY: no preconditions.
                let code = unsafe { GetLastError() };
                return Err(FifoError::os("read from pipe", &self.name, code));
            }
            on_chunk(&buf[..read as usize]);
        }
    }

    fn shutdown(self) {
        // SAFETY: handle is valid and not used after this point.
        unsafe {
            DisconnectNamedPipe(self.handle);
            CloseHandle(self.handle);
        }
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;

    fn unique_name(tag: &str) -> String {
        format!("ddnet-fifo-test-{}-{}", tag, std::process::id())
    }

    fn poll_all(pipe: &mut WindowsPipe) -> Vec<u8> {
        let mut out = Vec::new();
        pipe.poll(&mut |chunk: &[u8]| out.extend_from_slice(chunk)).unwrap();
        out
    }

    #[test]
    fn test_pipe_name_prefix() {
        assert_eq!(pipe_name("ddnet"), r"\\.\pipe\ddnet");
    }

    #[test]
    fn test_poll_without_client_is_empty() {
        let mut pipe = WindowsPipe::create(&unique_name("listen")).unwrap();
        assert!(poll_all(&mut pipe).is_empty());
        assert!(poll_all(&mut pipe).is_empty());
        pipe.shutdown();
    }

    #[test]
    fn test_poll_drains_client_messages() {
        let path = unique_name("drain");
        let mut pipe = WindowsPipe::create(&path).unwrap();

        let mut client = OpenOptions::new()
            .write(true)
            .open(pipe_name(&path))
            .unwrap();
        client.write_all(b"echo a\n").unwrap();
        client.write_all(b"echo b\n").unwrap();

        assert_eq!(poll_all(&mut pipe), b"echo a\necho b\n");
        assert!(poll_all(&mut pipe).is_empty());

        drop(client);
        // Disconnect is handled, not reported.
        assert!(poll_all(&mut pipe).is_empty());
        pipe.shutdown();
    }
}
