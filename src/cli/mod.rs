//! Command line front end: renders the engine's views from a snapshot file.

pub mod commands;
mod context;
pub mod output;

use std::{env, io};

use thiserror::Error;

use crate::errors::CoreError;

pub use context::{CliContext, TODAY_ENV};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("unknown command `{0}`; run `help` to list commands")]
    UnknownCommand(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type CommandResult = Result<(), CommandError>;

/// Global flags accepted before or after the command name.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Invocation {
    pub snapshot: Option<String>,
    pub command: Option<String>,
    pub args: Vec<String>,
}

impl Invocation {
    pub(crate) fn parse(raw: &[String]) -> Result<Self, CommandError> {
        let mut invocation = Invocation::default();
        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            if let Some(path) = arg.strip_prefix("--snapshot=") {
                invocation.snapshot = Some(path.to_string());
            } else if arg == "--snapshot" {
                let path = iter.next().ok_or_else(|| {
                    CommandError::InvalidArguments("`--snapshot` needs a file path".into())
                })?;
                invocation.snapshot = Some(path.clone());
            } else if invocation.command.is_none() {
                invocation.command = Some(arg.to_lowercase());
            } else {
                invocation.args.push(arg.clone());
            }
        }
        Ok(invocation)
    }
}

pub fn run_cli() -> CommandResult {
    let args: Vec<String> = env::args().skip(1).collect();
    run_with_args(&args)
}

pub fn run_with_args(args: &[String]) -> CommandResult {
    let invocation = Invocation::parse(args)?;
    let mut context = CliContext::new(invocation.snapshot.as_deref())?;
    let name = invocation.command.as_deref().unwrap_or("help");
    let handler = context
        .registry
        .get(name)
        .map(|definition| definition.handler)
        .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;
    let rest: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
    handler(&mut context, &rest)
}
