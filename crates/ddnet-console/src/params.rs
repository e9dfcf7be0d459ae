use anyhow::{Result, bail};

use crate::parser::{TokenError, next_token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamKind {
    Int,
    Str,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Param {
    kind: ParamKind,
    optional: bool,
}

/// Parameter list of a console command, e.g. `"s[name] ?i[count]"`.
///
/// `i` is an integer, `s` a string, `r` the rest of the line. `?` makes every
/// following parameter optional. Bracketed names are for help output only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    params: Vec<Param>,
    format: String,
}

/// Why a statement's arguments did not fit the command's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    Missing,
    NotAnInteger(String),
    UnterminatedQuote,
}

impl ParamSpec {
    pub fn parse(format: &str) -> Result<Self> {
        let mut params = Vec::new();
        let mut optional = false;
        let mut chars = format.chars();

        while let Some(c) = chars.next() {
            let kind = match c {
                ' ' => continue,
                '?' => {
                    optional = true;
                    continue;
                }
                '[' => bail!("parameter name without type in '{format}'"),
                'i' => ParamKind::Int,
                's' => ParamKind::Str,
                'r' => ParamKind::Rest,
                other => bail!("unknown parameter type '{other}' in '{format}'"),
            };
            if params.last().is_some_and(|p: &Param| p.kind == ParamKind::Rest) {
                bail!("'r' must be the last parameter in '{format}'");
            }
            params.push(Param { kind, optional });

            // skip the optional [name]
            let mut lookahead = chars.clone();
            if lookahead.next() == Some('[') {
                loop {
                    match lookahead.next() {
                        Some(']') => break,
                        Some(_) => {}
                        None => bail!("unterminated parameter name in '{format}'"),
                    }
                }
                chars = lookahead;
            }
        }

        Ok(Self {
            params,
            format: format.to_string(),
        })
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Number of required parameters.
    pub fn min_args(&self) -> usize {
        self.params.iter().take_while(|p| !p.optional).count()
    }

    /// Bind raw argument text to the parameters.
    ///
    /// Arguments beyond the last parameter are ignored.
    pub fn bind(&self, input: &str) -> std::result::Result<CommandArgs, ArgError> {
        let mut values = Vec::new();
        let mut rest = input;

        for param in &self.params {
            if param.kind == ParamKind::Rest {
                let raw = rest.trim_start();
                if raw.is_empty() {
                    if param.optional {
                        break;
                    }
                    return Err(ArgError::Missing);
                }
                values.push(raw.to_string());
                break;
            }

            let token = match next_token(rest) {
                Ok(Some((token, remaining))) => {
                    rest = remaining;
                    token
                }
                Ok(None) if param.optional => break,
                Ok(None) => return Err(ArgError::Missing),
                Err(TokenError::UnterminatedQuote) => return Err(ArgError::UnterminatedQuote),
            };
            if param.kind == ParamKind::Int && token.parse::<i64>().is_err() {
                return Err(ArgError::NotAnInteger(token));
            }
            values.push(token);
        }

        Ok(CommandArgs { values })
    }
}

/// Arguments of one executed statement, already checked against the
/// command's [`ParamSpec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandArgs {
    values: Vec<String>,
}

impl CommandArgs {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn get_int(&self, index: usize) -> Option<i64> {
        self.values.get(index).and_then(|v| v.parse().ok())
    }
}
