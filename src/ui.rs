// UI layer: runs one parsed command against the API client and writes the
// result through an injected output sink. `main` hands it stdout; tests
// hand it a `Vec<u8>`.
//
// API errors are reported here, as plain text on the sink. Every other
// failure (config, network, bad JSON) is returned to the caller.

use crate::api::{ApiClient, NewHook, Transport};
use crate::command::{self, Command, UsageError};
use crate::error::HooksError;
use anyhow::Result;
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;

/// How an invocation ended, used to pick the exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Help text was printed instead of running a command.
    Usage(UsageError),
    /// GitHub rejected a request; the error was written to the sink.
    ApiError,
}

impl Outcome {
    /// 0 on success and on the bare usage screen, 1 after an API error,
    /// 2 for any other usage error.
    pub fn status(&self) -> u8 {
        match self {
            Outcome::Success | Outcome::Usage(UsageError::Empty) => 0,
            Outcome::ApiError => 1,
            Outcome::Usage(_) => 2,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.status())
    }
}

/// Parse `args`, then either print help or build a client with `connect`
/// and execute the command. `connect` is not called for usage errors, so
/// neither the config file nor the network is touched in that case.
pub fn run<S, T, F, W>(args: &[S], connect: F, out: &mut W) -> Result<Outcome>
where
    S: AsRef<str>,
    T: Transport,
    F: FnOnce() -> Result<ApiClient<T>>,
    W: Write,
{
    match command::parse(args) {
        Ok(cmd) => execute(&connect()?, &cmd, out),
        Err(usage) => {
            out.write_all(usage.help().as_bytes())?;
            Ok(Outcome::Usage(usage))
        }
    }
}

/// Run a single command, writing its output (or its API error) to `out`.
pub fn execute<T: Transport, W: Write>(
    api: &ApiClient<T>,
    cmd: &Command,
    out: &mut W,
) -> Result<Outcome> {
    debug!(action = %cmd.action(), "running command");
    match dispatch(api, cmd, out) {
        Ok(()) => Ok(Outcome::Success),
        Err(err) => match err.downcast::<HooksError>() {
            Ok(api_err) if api_err.is_api() => {
                writeln!(out, "{api_err}")?;
                Ok(Outcome::ApiError)
            }
            Ok(other) => Err(other.into()),
            Err(err) => Err(err),
        },
    }
}

fn dispatch<T: Transport, W: Write>(api: &ApiClient<T>, cmd: &Command, out: &mut W) -> Result<()> {
    match cmd {
        Command::Ls { repo } => ls(api, repo, out),
        Command::Show { repo, hook_id } => show(api, repo, hook_id, out),
        Command::Add {
            repo,
            hook_type,
            events,
            config,
        } => {
            let hook = NewHook {
                name: hook_type.clone(),
                events: events.clone(),
                config: config.clone(),
            };
            add(api, repo, &hook, out)
        }
        Command::Edit {
            repo,
            hook_id,
            events,
            config,
        } => {
            api.edit_hook(repo, hook_id, events.clone(), config.clone())?;
            writeln!(out, "Hook {hook_id} updated")?;
            Ok(())
        }
        Command::Rm { repo, hook_id } => {
            api.delete_hook(repo, hook_id)?;
            writeln!(out, "Hook with id {hook_id} deleted.")?;
            Ok(())
        }
    }
}

/// All hooks on one line, or a note when there are none.
fn ls<T: Transport, W: Write>(api: &ApiClient<T>, repo: &str, out: &mut W) -> Result<()> {
    let hooks = api.list_hooks(repo)?;
    if hooks.is_empty() {
        writeln!(out, "No hooks found.")?;
    } else {
        let lines: Vec<String> = hooks.iter().map(|h| h.summary()).collect();
        writeln!(out, "{}", lines.join(" "))?;
    }
    Ok(())
}

fn show<T: Transport, W: Write>(
    api: &ApiClient<T>,
    repo: &str,
    hook_id: &str,
    out: &mut W,
) -> Result<()> {
    let body = api.show_hook(repo, hook_id)?;
    writeln!(out, "{body}")?;
    Ok(())
}

fn add<T: Transport, W: Write>(
    api: &ApiClient<T>,
    repo: &str,
    hook: &NewHook,
    out: &mut W,
) -> Result<()> {
    let created = api.create_hook(repo, hook)?;
    writeln!(out, "New hook of with id {} created.", created.id)?;
    Ok(())
}
