// Console line syntax
//
// A line holds statements separated by `;`. `#` starts a comment. Both are
// literal inside double quotes, where `\"` and `\\` are the only escapes.

/// Split `line` into raw statements, dropping comments and empty statements.
pub fn split_statements(line: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut end = line.len();

    for (i, c) in line.char_indices() {
        if in_quotes {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ';' => {
                push_statement(&mut statements, &line[start..i]);
                start = i + 1;
            }
            '#' => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    if start <= end {
        push_statement(&mut statements, &line[start..end]);
    }
    statements
}

fn push_statement<'a>(statements: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        statements.push(trimmed);
    }
}

/// Split a statement into its command name and the raw argument text.
pub fn split_command(statement: &str) -> Option<(&str, &str)> {
    let statement = statement.trim_start();
    if statement.is_empty() {
        return None;
    }
    match statement.find(char::is_whitespace) {
        Some(i) => Some((&statement[..i], statement[i..].trim_start())),
        None => Some((statement, "")),
    }
}

/// Error while reading a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    UnterminatedQuote,
}

/// Read one argument from the front of `input`.
///
/// Returns the unescaped token and the remaining input, or `None` when the
/// input holds only whitespace.
pub fn next_token(input: &str) -> Result<Option<(String, &str)>, TokenError> {
    let input = input.trim_start();
    if input.is_empty() {
        return Ok(None);
    }

    if let Some(quoted) = input.strip_prefix('"') {
        let mut token = String::new();
        let mut escaped = false;
        for (i, c) in quoted.char_indices() {
            if escaped {
                if c != '"' && c != '\\' {
                    token.push('\\');
                }
                token.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                return Ok(Some((token, &quoted[i + 1..])));
            } else {
                token.push(c);
            }
        }
        return Err(TokenError::UnterminatedQuote);
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    Ok(Some((input[..end].to_string(), &input[end..])))
}
