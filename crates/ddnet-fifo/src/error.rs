use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FifoError {
    #[error("'{path}' is not a fifo and could not be replaced")]
    NotAFifo { path: String },

    #[error("can't create fifo '{path}'")]
    Create {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("can't open file '{path}'")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to read from '{path}'")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Win32 call failure, with the system message for `code`.
    #[error("failed to {op} '{path}' ({code} {message})")]
    Os {
        op: &'static str,
        path: String,
        code: u32,
        message: String,
    },

    #[error("invalid pipe path '{path}'")]
    InvalidPath { path: String },
}

impl FifoError {
    /// Build an [`FifoError::Os`] from a raw Win32 error code.
    pub fn os(op: &'static str, path: &str, code: u32) -> Self {
        let message = io::Error::from_raw_os_error(code as i32).to_string();
        Self::Os {
            op,
            path: path.to_string(),
            code,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = FifoError::NotAFifo {
            path: "/tmp/x".into(),
        };
        assert_eq!(err.to_string(), "'/tmp/x' is not a fifo and could not be replaced");

        let err = FifoError::Open {
            path: "/tmp/x".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.to_string(), "can't open file '/tmp/x'");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_os_error_carries_code() {
        let err = FifoError::os("connect named pipe", r"\\.\pipe\ddnet", 5);
        match &err {
            FifoError::Os { op, code, message, .. } => {
                assert_eq!(*op, "connect named pipe");
                assert_eq!(*code, 5);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with(r"failed to connect named pipe '\\.\pipe\ddnet' (5 "));
    }
}
