use thiserror::Error;

/// Commands understood by the REPL. They start with ':'.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Load,
    Steps,
    Limit,
    Pause,
}

pub struct CommandClassifier<'a> {
    pub short_name: &'a str,
    pub long_name: &'a str,
    pub cmd: Command,
    pub arg_expected: bool,
    description: &'a str,
}

pub const COMMAND_CLASSIFIER : &[CommandClassifier] = &[
    CommandClassifier {
        short_name: "h",
        long_name: "help",
        cmd: Command::Help,
        arg_expected: false,
        description: "print this message.",
    },
    CommandClassifier {
        short_name: "l",
        long_name: "load",
        cmd: Command::Load,
        arg_expected: true,
        description: "evaluate all lines from a file.",
    },
    CommandClassifier {
        short_name: "s",
        long_name: "steps",
        cmd: Command::Steps,
        arg_expected: false,
        description: "toggle printing every reduction step instead of only the normal form.",
    },
    CommandClassifier {
        short_name: "m",
        long_name: "limit",
        cmd: Command::Limit,
        arg_expected: true,
        description: "set the maximum number of reduction steps (0 for no limit).",
    },
    CommandClassifier {
        short_name: "p",
        long_name: "pause",
        cmd: Command::Pause,
        arg_expected: false,
        description: "toggle pause mode, in which the user must press Enter before each reduction step",
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command ':{0}'")]
    Unknown(String),
    #[error("command ':{0}' expects an argument")]
    MissingArgument(&'static str),
    #[error("command ':{0}' takes no argument")]
    UnexpectedArgument(&'static str),
    #[error("invalid step limit '{0}'")]
    InvalidLimit(String),
}

pub fn print_usage() {
    println!(
"An untyped lambda calculus front end.

Usage: lambda_front [-h] [-n] [-m STEPS] [FILE...]
  -h, --help            print this message and exit.
  -n, --no-interactive  evaluate FILE (or stdin) and exit.
  -m, --max-steps N     give up after N reduction steps (0 for no limit).

Expressions are written like 'λx y. x' or '\\x y. x'.
Set RUST_LOG=trace to log every reduction step.

Available commands:"
    );
    for command in COMMAND_CLASSIFIER {
        println!(":{}, :{}\t{}",
                 command.short_name,
                 command.long_name,
                 command.description);
    }
}

/// Splits a REPL line into a command and its argument, if the line is a
/// command at all.
pub fn parse_command(line: &str) -> Option<Result<(Command, Option<&str>), CommandError>> {
    let rest = line.trim_start().strip_prefix(':')?;
    let (name, arg) = match rest.find(char::is_whitespace) {
        None => (rest, None),
        Some(pos) => {
            let arg = rest[pos..].trim();
            (&rest[..pos], if arg.is_empty() { None } else { Some(arg) })
        },
    };
    let class = match get_command(name) {
        None => return Some(Err(CommandError::Unknown(name.to_string()))),
        Some(class) => class,
    };
    let result = match (class.arg_expected, arg) {
        (true, None) => Err(CommandError::MissingArgument(class.long_name)),
        (false, Some(_)) => Err(CommandError::UnexpectedArgument(class.long_name)),
        _ => Ok((class.cmd, arg)),
    };
    Some(result)
}

/// Reads a step limit, where 0 stands for no limit at all.
pub fn parse_step_limit(s: &str) -> Result<Option<usize>, CommandError> {
    match s.trim().parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(CommandError::InvalidLimit(s.to_string())),
    }
}

pub fn get_command(name: &str) -> Option<&'static CommandClassifier<'static>> {
    COMMAND_CLASSIFIER
        .iter()
        .find(|class| name == class.short_name || name == class.long_name)
}

// get the command entry in COMMAND_CLASSIFIER whose long name starts with prefix.
pub fn get_command_starts_with(prefix: &str) -> Option<&'static CommandClassifier<'static>> {
    COMMAND_CLASSIFIER
        .iter()
        .find(|class| class.long_name.starts_with(prefix))
}
