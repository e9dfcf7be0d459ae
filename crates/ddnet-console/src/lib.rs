// Console command execution
//
// Parses console lines (`;`-separated statements, quoted arguments, `#`
// comments), binds arguments to each command's parameter list, and runs the
// command if its flags allow the line's origin.

pub mod console;
pub mod params;
pub mod parser;

pub use console::{CommandFn, Console, Invocation, Outcome};
pub use params::{ArgError, CommandArgs, ParamSpec};
