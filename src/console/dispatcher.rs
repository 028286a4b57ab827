//! Command dispatch
//!
//! A submitted line is matched against [`COMMANDS`] in table order. Exact
//! commands must equal the whole line; prefix commands match on their name
//! alone and hand the rest of the line, left-trimmed of spaces and tabs,
//! to the handler. So `statusgpioa` reaches `status` with `gpioa`, and
//! `echoes` echoes `es`.

use core::fmt::Write;

use super::commands;
use super::ConsoleError;
use crate::hal::board::Board;

/// How a command name is matched against the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Line equals the name
    Exact,
    /// Line starts with the name; remainder is the argument text
    Prefix,
}

/// Command handler tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    SysInfo,
    Status,
    Echo,
    ShowReg,
    Clear,
}

impl Command {
    /// Run the handler for this command.
    pub fn run(
        self,
        args: &str,
        board: &dyn Board,
        out: &mut dyn Write,
    ) -> Result<(), ConsoleError> {
        match self {
            Command::Help => commands::help(out),
            Command::SysInfo => commands::sysinfo(board, out),
            Command::Status => commands::status(args, board, out),
            Command::Echo => commands::echo(args, out),
            Command::ShowReg => commands::showreg(args, board, out),
            Command::Clear => commands::clear(out),
        }
    }
}

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub synopsis: &'static str,
    pub brief: &'static str,
    pub rule: MatchRule,
    pub command: Command,
}

/// All available commands, in match order
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "help",
        synopsis: "help",
        brief: "Show this help message",
        rule: MatchRule::Exact,
        command: Command::Help,
    },
    CommandDescriptor {
        name: "sysinfo",
        synopsis: "sysinfo",
        brief: "Display system information",
        rule: MatchRule::Exact,
        command: Command::SysInfo,
    },
    CommandDescriptor {
        name: "status",
        synopsis: "status <gpioa|gpiob|gpioc|gpiod|uart2|rcc|timer1>",
        brief: "Show peripheral status",
        rule: MatchRule::Prefix,
        command: Command::Status,
    },
    CommandDescriptor {
        name: "echo",
        synopsis: "echo <text>",
        brief: "Echo text back to console",
        rule: MatchRule::Prefix,
        command: Command::Echo,
    },
    CommandDescriptor {
        name: "showreg",
        synopsis: "showreg <uart2|gpioa|rcc|timer1>",
        brief: "Display raw register values",
        rule: MatchRule::Prefix,
        command: Command::ShowReg,
    },
    CommandDescriptor {
        name: "clear",
        synopsis: "clear",
        brief: "Clear screen",
        rule: MatchRule::Exact,
        command: Command::Clear,
    },
];

/// What `dispatch` did, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Blank after trimming; nothing printed
    Empty,
    /// No command matched; "unknown command" printed
    Unknown,
    /// Handler ran to completion
    Ran(Command),
    /// Handler reported an error, already printed
    Failed(Command, ConsoleError),
}

/// Find the command for a (trimmed) line and its argument text.
pub fn resolve(line: &str) -> Option<(&'static CommandDescriptor, &str)> {
    COMMANDS.iter().find_map(|desc| match desc.rule {
        MatchRule::Exact => (line == desc.name).then_some((desc, "")),
        MatchRule::Prefix => line
            .strip_prefix(desc.name)
            .map(|rest| (desc, rest.trim_start_matches(is_blank))),
    })
}

/// Run a submitted line. Never fails: every problem becomes output text.
pub fn dispatch(line: &str, board: &dyn Board, out: &mut dyn Write) -> DispatchOutcome {
    let line = line.trim_matches(is_blank);
    if line.is_empty() {
        return DispatchOutcome::Empty;
    }

    let Some((desc, args)) = resolve(line) else {
        let _ = write!(out, "{}: {}\r\n", ConsoleError::UnknownCommand.message(), line);
        return DispatchOutcome::Unknown;
    };

    match desc.command.run(args, board, out) {
        Ok(()) => DispatchOutcome::Ran(desc.command),
        Err(err) => {
            match err {
                ConsoleError::InvalidArgument => {
                    let _ = write!(out, "Usage: {}\r\n", desc.synopsis);
                }
                _ => {
                    let _ = write!(out, "{}: {}\r\n", desc.name, err);
                }
            }
            DispatchOutcome::Failed(desc.command, err)
        }
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Get all command names
pub fn command_names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|c| c.name)
}
