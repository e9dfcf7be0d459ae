// Line splitting for raw pipe reads.

use std::borrow::Cow;

/// Split `chunk` on `\n` and hand each line to `dispatch`, in order.
///
/// Bytes after the last newline are dispatched as one more line, so input
/// without a trailing newline still executes. A line cut short by the read
/// size limit is therefore dispatched as if complete and its tail arrives as
/// a separate line on the next read.
///
/// Each line ends at its first NUL byte and is decoded lossily; nothing else
/// is trimmed or validated.
///
/// Returns the number of dispatched lines.
pub fn split_lines(chunk: &[u8], mut dispatch: impl FnMut(&str)) -> usize {
    let mut count = 0;
    let mut start = 0;
    for (i, &byte) in chunk.iter().enumerate() {
        if byte != b'\n' {
            continue;
        }
        dispatch(&decode(&chunk[start..i]));
        count += 1;
        start = i + 1;
    }
    // missed the last line
    if start < chunk.len() {
        dispatch(&decode(&chunk[start..]));
        count += 1;
    }
    count
}

fn decode(line: &[u8]) -> Cow<'_, str> {
    let end = line.iter().position(|&b| b == 0).unwrap_or(line.len());
    String::from_utf8_lossy(&line[..end])
}
