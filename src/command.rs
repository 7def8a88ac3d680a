// Command parsing: turns the raw positional arguments into a `Command`, or
// into a `UsageError` describing which help text to print. Nothing here
// touches the network or the config file.

use std::collections::BTreeMap;
use std::fmt;

/// The verbs understood by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Ls,
    Show,
    Add,
    Edit,
    Rm,
}

/// Action name, one-line description and usage line, in display order.
static ACTIONS: [(Action, &str, &str, &str); 5] = [
    (Action::Ls, "ls", "List the hooks on a repository.", "ls REPONAME"),
    (Action::Show, "show", "Show a hook in detail.", "show REPONAME ID"),
    (
        Action::Add,
        "add",
        "Add a hook.",
        "add REPONAME TYPE EVENT[,EVENT...] [OPTION:VALUE[,OPTION:VALUE...]]",
    ),
    (
        Action::Edit,
        "edit",
        "Edit a hook.",
        "edit REPONAME ID EVENT[,EVENT...] [OPTION:VALUE[,OPTION:VALUE...]]",
    ),
    (Action::Rm, "rm", "Remove a hook.", "rm REPONAME ID"),
];

impl Action {
    pub fn from_name(name: &str) -> Option<Self> {
        ACTIONS.iter().find(|a| a.1 == name).map(|a| a.0)
    }

    fn entry(self) -> &'static (Action, &'static str, &'static str, &'static str) {
        // ACTIONS follows the variant declaration order.
        &ACTIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn description(self) -> &'static str {
        self.entry().2
    }

    pub fn usage(self) -> &'static str {
        self.entry().3
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully validated invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ls {
        repo: String,
    },
    Show {
        repo: String,
        hook_id: String,
    },
    Add {
        repo: String,
        hook_type: String,
        events: Vec<String>,
        config: BTreeMap<String, String>,
    },
    Edit {
        repo: String,
        hook_id: String,
        events: Vec<String>,
        config: BTreeMap<String, String>,
    },
    Rm {
        repo: String,
        hook_id: String,
    },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::Ls { .. } => Action::Ls,
            Command::Show { .. } => Action::Show,
            Command::Add { .. } => Action::Add,
            Command::Edit { .. } => Action::Edit,
            Command::Rm { .. } => Action::Rm,
        }
    }
}

/// Why the arguments could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    /// No arguments at all.
    Empty,
    UnknownAction(String),
    /// A known action with missing or malformed arguments.
    BadArguments(Action),
}

impl UsageError {
    /// Help text for this error, newline-terminated.
    pub fn help(&self) -> String {
        match self {
            UsageError::Empty => top_level_usage(),
            UsageError::UnknownAction(name) => {
                format!("UNKNOWN ACTION {name}\n{}", top_level_usage())
            }
            UsageError::BadArguments(action) => format!("USAGE: {}\n", action.usage()),
        }
    }
}

/// The block printed when no action is known.
pub fn top_level_usage() -> String {
    let mut out =
        String::from("USAGE:\nManage the hooks of GitHub repositories.\n\nAvailable actions:\n");
    for (action, ..) in ACTIONS.iter() {
        out.push_str(&format!("  {}\n      {}\n", action.usage(), action.description()));
    }
    out
}

/// Parse the arguments that follow the program name.
pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Command, UsageError> {
    let mut args = args.iter().map(|s| s.as_ref());
    let name = args.next().ok_or(UsageError::Empty)?;
    let action =
        Action::from_name(name).ok_or_else(|| UsageError::UnknownAction(name.to_string()))?;

    let bad = || UsageError::BadArguments(action);
    let command = match action {
        Action::Ls => Command::Ls {
            repo: required(&mut args, action)?,
        },
        Action::Show => Command::Show {
            repo: required(&mut args, action)?,
            hook_id: required(&mut args, action)?,
        },
        Action::Rm => Command::Rm {
            repo: required(&mut args, action)?,
            hook_id: required(&mut args, action)?,
        },
        Action::Add => {
            let repo = required(&mut args, action)?;
            let hook_type = required(&mut args, action)?;
            let events = parse_events(&required(&mut args, action)?).ok_or_else(bad)?;
            let config = parse_options(args.next().unwrap_or("")).ok_or_else(bad)?;
            Command::Add {
                repo,
                hook_type,
                events,
                config,
            }
        }
        Action::Edit => {
            let repo = required(&mut args, action)?;
            let hook_id = required(&mut args, action)?;
            let events = parse_events(&required(&mut args, action)?).ok_or_else(bad)?;
            let config = parse_options(args.next().unwrap_or("")).ok_or_else(bad)?;
            Command::Edit {
                repo,
                hook_id,
                events,
                config,
            }
        }
    };
    Ok(command)
}

/// Next positional argument; missing or empty is a usage error.
fn required<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    action: Action,
) -> Result<String, UsageError> {
    args.next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(UsageError::BadArguments(action))
}

/// Split `push,pull_request` into events, keeping caller order. Empty
/// segments are dropped; `None` if nothing is left.
pub fn parse_events(list: &str) -> Option<Vec<String>> {
    let events: Vec<String> = list
        .split(',')
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect();
    if events.is_empty() {
        None
    } else {
        Some(events)
    }
}

/// Parse `key:value[,key:value...]`. Each pair splits on its first colon,
/// later keys overwrite earlier ones. `None` if a pair has no colon.
pub fn parse_options(list: &str) -> Option<BTreeMap<String, String>> {
    let mut options = BTreeMap::new();
    for pair in list.split(',').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once(':')?;
        options.insert(key.to_string(), value.to_string());
    }
    Some(options)
}
