use std::fmt;

use crate::flags::ConfigFlags;

/// Identity of the network client a command originated from.
///
/// Local sources (typed input, config files, the input FIFO) use
/// [`ClientId::NONE`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClientId(Option<u32>);

impl ClientId {
    pub const NONE: Self = Self(None);

    pub const fn new(id: u32) -> Self {
        Self(Some(id))
    }

    pub const fn get(self) -> Option<u32> {
        self.0
    }

    /// Raw engine value: the client index, or `-1` for no client.
    pub fn as_raw(self) -> i64 {
        self.0.map_or(-1, i64::from)
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "ClientId({id})"),
            None => f.write_str("ClientId(none)"),
        }
    }
}

/// Executes console command lines.
///
/// `flag_mask` tags the origin of the line so the implementation can apply
/// different permission rules per source. Implementations report problems
/// through their own channels (logging, console output); nothing flows back
/// to the producer.
pub trait CommandSink {
    fn execute_line_flag(&mut self, line: &str, flag_mask: ConfigFlags, client_id: ClientId);
}

impl<S: CommandSink + ?Sized> CommandSink for &mut S {
    fn execute_line_flag(&mut self, line: &str, flag_mask: ConfigFlags, client_id: ClientId) {
        (**self).execute_line_flag(line, flag_mask, client_id);
    }
}

impl<S: CommandSink + ?Sized> CommandSink for Box<S> {
    fn execute_line_flag(&mut self, line: &str, flag_mask: ConfigFlags, client_id: ClientId) {
        (**self).execute_line_flag(line, flag_mask, client_id);
    }
}
