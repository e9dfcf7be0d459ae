// Test doubles for CommandSink consumers.

use crate::flags::ConfigFlags;
use crate::sink::{ClientId, CommandSink};

/// One recorded `execute_line_flag` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedLine {
    pub line: String,
    pub flag_mask: ConfigFlags,
    pub client_id: ClientId,
}

/// Sink that records every line it is handed, in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub executed: Vec<ExecutedLine>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<&str> {
        self.executed.iter().map(|e| e.line.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.executed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.executed.is_empty()
    }

    pub fn clear(&mut self) {
        self.executed.clear();
    }
}

impl CommandSink for RecordingSink {
    fn execute_line_flag(&mut self, line: &str, flag_mask: ConfigFlags, client_id: ClientId) {
        self.executed.push(ExecutedLine {
            line: line.to_string(),
            flag_mask,
            client_id,
        });
    }
}
