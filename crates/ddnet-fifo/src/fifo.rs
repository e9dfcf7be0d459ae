// Fifo channel lifecycle
//
// disabled --init(ok)--> active --shutdown--> disabled
// disabled --init(err)--> disabled (logged, never retried)

use ddnet_types::{ClientId, CommandSink, ConfigFlags};
use log::{error, info, warn};

use crate::lines::split_lines;
use crate::transport::{PipeTransport, PlatformTransport};

enum State<T> {
    Disabled,
    Active(T),
}

/// Inbound console command channel.
///
/// Created disabled. [`Fifo::init`] provisions the pipe; afterwards
/// [`Fifo::update`] is called once per frame and executes every received line
/// through the sink with the configured origin flag and no client id.
pub struct Fifo<T: PipeTransport = PlatformTransport> {
    state: State<T>,
    flag: ConfigFlags,
}

impl<T: PipeTransport> Default for Fifo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PipeTransport> Fifo<T> {
    pub fn new() -> Self {
        Self {
            state: State::Disabled,
            flag: ConfigFlags::empty(),
        }
    }

    /// Open the channel at `path`.
    ///
    /// An empty path leaves the channel disabled. Provisioning failures are
    /// logged and also leave it disabled; check [`Fifo::is_active`] if the
    /// outcome matters.
    pub fn init(&mut self, path: &str, flag: ConfigFlags) {
        self.shutdown();
        self.flag = flag;
        if path.is_empty() {
            return;
        }

        match T::create(path) {
            Ok(transport) => {
                info!("listening for commands on '{}'", transport.describe());
                self.state = State::Active(transport);
            }
            Err(e) => {
                error!("fifo '{}' disabled: {}", path, error_chain(&e));
            }
        }
    }

    /// Poll the pipe and execute each received line. Never blocks.
    ///
    /// Returns the number of lines handed to `sink`.
    pub fn update(&mut self, sink: &mut dyn CommandSink) -> usize {
        let State::Active(transport) = &mut self.state else {
            return 0;
        };

        let flag = self.flag;
        let mut count = 0;
        let result = transport.poll(&mut |chunk: &[u8]| {
            count += split_lines(chunk, |line| {
                sink.execute_line_flag(line, flag, ClientId::NONE);
            });
        });
        if let Err(e) = result {
            warn!("{}", error_chain(&e));
        }
        count
    }

    /// Release the pipe. Safe to call repeatedly or before `init`.
    pub fn shutdown(&mut self) {
        if let State::Active(transport) = std::mem::replace(&mut self.state, State::Disabled) {
            info!("closing '{}'", transport.describe());
            transport.shutdown();
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active(_))
    }

    /// Origin flag attached to every executed line.
    pub fn flag(&self) -> ConfigFlags {
        self.flag
    }

    /// Path or pipe name of the open channel.
    pub fn path(&self) -> Option<&str> {
        match &self.state {
            State::Active(transport) => Some(transport.describe()),
            State::Disabled => None,
        }
    }
}

impl<T: PipeTransport> Drop for Fifo<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
