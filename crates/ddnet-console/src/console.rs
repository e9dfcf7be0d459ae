use std::collections::BTreeMap;

use anyhow::Result;
use ddnet_types::{ClientId, CommandSink, ConfigFlags};
use log::{debug, info, warn};

use crate::params::{ArgError, CommandArgs, ParamSpec};
use crate::parser::{split_command, split_statements};

/// Command callback. Receives the bound arguments and the context of the
/// statement that invoked it.
pub type CommandFn = Box<dyn FnMut(&CommandArgs, &Invocation<'_>) -> Result<()>>;

/// Context of one running statement.
pub struct Invocation<'a> {
    /// Read access to the console (for introspection such as `help`).
    pub console: &'a Console,
    /// Mask of the line being executed, not the console's own mask.
    pub flag_mask: ConfigFlags,
    pub client_id: ClientId,
}

impl Invocation<'_> {
    /// Commands the invoking line is allowed to run.
    pub fn command_names(&self) -> Vec<&str> {
        self.console.command_names(self.flag_mask)
    }
}

type Builtin = fn(&CommandArgs, &Invocation<'_>) -> Result<()>;

const BUILTINS: [(&str, &str, &str, Builtin); 2] = [
    ("echo", "r[text]", "Echo the text", echo),
    (
        "help",
        "?s[command]",
        "Show help for a command or list all commands",
        help,
    ),
];

fn echo(args: &CommandArgs, _: &Invocation<'_>) -> Result<()> {
    info!("{}", args.get_string(0).unwrap_or_default());
    Ok(())
}

fn help(args: &CommandArgs, invocation: &Invocation<'_>) -> Result<()> {
    match args.get_string(0) {
        Some(name) => match invocation.console.usage(name) {
            Some((usage, help)) => info!("{usage} - {help}"),
            None => info!("No such command: {name}."),
        },
        None => info!("Commands: {}", invocation.command_names().join(", ")),
    }
    Ok(())
}

struct CommandInfo {
    params: ParamSpec,
    flags: ConfigFlags,
    help: String,
    // Taken out while the command runs.
    callback: Option<CommandFn>,
}

/// What happened to one statement. Mostly useful to tests and the host's
/// counters; the console itself reports through the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Executed,
    UnknownCommand,
    AccessDenied,
    InvalidArguments,
    Failed,
}

/// Command registry and executor.
///
/// Every registered command carries [`ConfigFlags`]; a statement only runs
/// when the command's flags intersect the mask it was executed with.
pub struct Console {
    commands: BTreeMap<String, CommandInfo>,
    flag_mask: ConfigFlags,
    executed: u64,
    rejected: u64,
}

impl Default for Console {
    fn default() -> Self {
        Self::new(ConfigFlags::CLIENT)
    }
}

impl Console {
    /// Empty console whose own input (see [`Console::execute_line`]) runs
    /// with `flag_mask`.
    pub fn new(flag_mask: ConfigFlags) -> Self {
        Self {
            commands: BTreeMap::new(),
            flag_mask,
            executed: 0,
            rejected: 0,
        }
    }

    /// Console with `echo` and `help` registered.
    pub fn with_builtins(flag_mask: ConfigFlags) -> Result<Self> {
        let mut console = Self::new(flag_mask);
        for (name, params, help, callback) in BUILTINS {
            console.register(
                name,
                params,
                ConfigFlags::CLIENT | ConfigFlags::SERVER,
                help,
                Box::new(callback),
            )?;
        }
        Ok(console)
    }

    /// Register `name`. A later registration with the same name replaces the
    /// earlier one.
    pub fn register(
        &mut self,
        name: &str,
        params: &str,
        flags: ConfigFlags,
        help: &str,
        callback: CommandFn,
    ) -> Result<()> {
        let params = ParamSpec::parse(params)?;
        let info = CommandInfo {
            params,
            flags,
            help: help.to_string(),
            callback: Some(callback),
        };
        if self.commands.insert(name.to_string(), info).is_some() {
            debug!("command '{name}' re-registered");
        }
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.commands.remove(name).is_some()
    }

    pub fn flag_mask(&self) -> ConfigFlags {
        self.flag_mask
    }

    pub fn set_flag_mask(&mut self, flag_mask: ConfigFlags) {
        self.flag_mask = flag_mask;
    }

    /// Names of the commands a line executed with `flag_mask` may run.
    pub fn command_names(&self, flag_mask: ConfigFlags) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|(_, info)| info.flags.intersects(flag_mask))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// `"name params"` and the help text of a command.
    pub fn usage(&self, name: &str) -> Option<(String, &str)> {
        self.commands.get(name).map(|info| {
            let usage = if info.params.format().is_empty() {
                name.to_string()
            } else {
                format!("{name} {}", info.params.format())
            };
            (usage, info.help.as_str())
        })
    }

    /// Number of statements that ran their command.
    pub fn executed_count(&self) -> u64 {
        self.executed
    }

    /// Number of statements refused (unknown, denied, bad arguments, failed).
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    /// Execute a line with the console's own flag mask.
    pub fn execute_line(&mut self, line: &str) -> Vec<Outcome> {
        let mask = self.flag_mask;
        self.execute(line, mask, ClientId::NONE)
    }

    /// Execute every statement in `line` against `flag_mask`.
    pub fn execute(
        &mut self,
        line: &str,
        flag_mask: ConfigFlags,
        client_id: ClientId,
    ) -> Vec<Outcome> {
        let outcomes: Vec<Outcome> = split_statements(line)
            .into_iter()
            .map(|statement| self.execute_statement(statement, flag_mask, client_id))
            .collect();
        for outcome in &outcomes {
            if *outcome == Outcome::Executed {
                self.executed += 1;
            } else {
                self.rejected += 1;
            }
        }
        outcomes
    }

    fn execute_statement(
        &mut self,
        statement: &str,
        flag_mask: ConfigFlags,
        client_id: ClientId,
    ) -> Outcome {
        let Some((name, raw_args)) = split_command(statement) else {
            return Outcome::UnknownCommand;
        };
        let Some(info) = self.commands.get_mut(name) else {
            info!("No such command: {name}.");
            return Outcome::UnknownCommand;
        };
        if !info.flags.intersects(flag_mask) {
            info!("Access for command {name} denied.");
            return Outcome::AccessDenied;
        }

        let args = match info.params.bind(raw_args) {
            Ok(args) => args,
            Err(e) => {
                let reason = match e {
                    ArgError::Missing => "missing argument".to_string(),
                    ArgError::NotAnInteger(v) => format!("'{v}' is not an integer"),
                    ArgError::UnterminatedQuote => "unterminated quote".to_string(),
                };
                info!(
                    "Invalid arguments ({reason}). Usage: {name} {}",
                    info.params.format()
                );
                return Outcome::InvalidArguments;
            }
        };

        let Some(mut callback) = info.callback.take() else {
            warn!("command '{name}' is already running");
            return Outcome::Failed;
        };
        debug!(
            "executing '{statement}' (mask {flag_mask:?}, client {})",
            client_id.as_raw()
        );
        let invocation = Invocation {
            console: self,
            flag_mask,
            client_id,
        };
        let result = callback(&args, &invocation);
        if let Some(info) = self.commands.get_mut(name) {
            info.callback = Some(callback);
        }

        match result {
            Ok(()) => Outcome::Executed,
            Err(e) => {
                warn!("command '{name}' failed: {e:#}");
                Outcome::Failed
            }
        }
    }
}

impl CommandSink for Console {
    fn execute_line_flag(&mut self, line: &str, flag_mask: ConfigFlags, client_id: ClientId) {
        self.execute(line, flag_mask, client_id);
    }
}
