//! Command-line flags layered over YAML through a provider group.

use std::sync::Arc;

use anyhow::{Result, ensure};
use clap::{Arg, ArgAction, Command};
use rstest::{fixture, rstest};
use tiered_config::{
    ConfigError, Populate, Provider, ProviderGroup, ROOT, TreeProvider,
    command_line_provider_from_args,
};

#[derive(Debug, Default, Populate)]
struct Server {
    host: String,
    port: u16,
    #[config(default = "false")]
    verbose: bool,
    tags: Vec<String>,
}

#[derive(Debug, Default, Populate)]
struct App {
    server: Server,
    level: u8,
}

#[fixture]
fn command() -> Command {
    Command::new("app")
        .arg(Arg::new("server.host").long("host"))
        .arg(
            Arg::new("server.port")
                .long("port")
                .value_parser(clap::value_parser!(u16))
                .default_value("8080"),
        )
        .arg(
            Arg::new("server.verbose")
                .long("verbose")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("server.tags").long("tag").action(ArgAction::Append))
        .arg(Arg::new("level").short('v').action(ArgAction::Count))
}

fn layered(command: &Command, args: &[&str]) -> Result<App> {
    let flags = command_line_provider_from_args(command, args.iter().copied())?;
    let file = TreeProvider::from_yaml_sources(
        "file",
        ["server:\n  host: file.example\n  port: 9000\n  tags: [base]\n"],
    )?;
    let layers: Vec<Arc<dyn Provider>> = vec![flags, file];
    let group = ProviderGroup::new("app", layers);
    let mut app = App::default();
    group.get(ROOT).populate(&mut app)?;
    Ok(app)
}

#[rstest]
fn typed_flags_override_single_nested_fields(command: Command) -> Result<()> {
    let app = layered(
        &command,
        &["app", "--host", "cli.example", "--tag", "a", "--tag", "b", "-vv", "--verbose"],
    )?;

    ensure!(app.server.host == "cli.example");
    ensure!(app.server.port == 9000, "clap defaults do not hide the file value");
    ensure!(app.server.tags == ["a", "b"], "tags were {:?}", app.server.tags);
    ensure!(app.server.verbose);
    ensure!(app.level == 2);
    Ok(())
}

#[rstest]
fn untouched_flags_fall_through(command: Command) -> Result<()> {
    let app = layered(&command, &["app"])?;

    ensure!(app.server.host == "file.example");
    ensure!(app.server.tags == ["base"]);
    ensure!(!app.server.verbose, "unset switches fall back to the field default");
    ensure!(app.level == 0);
    Ok(())
}

#[rstest]
fn explicit_port_beats_the_file(command: Command) -> Result<()> {
    let app = layered(&command, &["app", "--port", "7000"])?;
    ensure!(app.server.port == 7000);
    Ok(())
}

#[rstest]
fn unknown_flags_are_construction_errors(command: Command) -> Result<()> {
    let outcome = command_line_provider_from_args(&command, ["app", "--bogus"]);
    ensure!(matches!(outcome, Err(ConfigError::CommandLine(_))));
    Ok(())
}

#[rstest]
fn conflicting_ids_are_merge_conflicts() -> Result<()> {
    let command = Command::new("app")
        .arg(Arg::new("server").long("server"))
        .arg(Arg::new("server.port").long("port"));
    let outcome = command_line_provider_from_args(&command, ["app", "--server", "x", "--port", "1"]);
    ensure!(
        matches!(outcome, Err(ConfigError::MergeConflict { ref path, .. }) if path == "server"),
        "expected a conflict at 'server'"
    );
    Ok(())
}
