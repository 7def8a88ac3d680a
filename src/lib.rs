// Library root
// -----------
// This crate exposes the pieces of the `github-hooks` CLI so they can be
// driven from tests as well as from `main.rs`.
//
// Module responsibilities:
// - `config`: locates and parses the YAML file with the GitHub user and
//   the Basic auth credentials.
// - `command`: turns positional arguments into a validated `Command` and
//   holds the static usage table.
// - `api`: blocking HTTP client for the repository hooks endpoints.
// - `ui`: runs a command and writes its output through an injected sink.
// - `error`: the error type shared by `config` and `api`.
pub mod api;
pub mod command;
pub mod config;
pub mod error;
pub mod ui;
