//! Command-line interface for the showcase binary.

use anyhow::{Context, Result, bail};
use showcase_engine::scene::Scene;

pub const USAGE: &str = "\
usage: showcase [SCENE] [--srgb] [--log FILTER]
       showcase --list | --help

scenes: triangle (default), pyramid, pyramid-outline
";

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Open the window and animate a scene.
    Run(RunOptions),
    /// Print the scene names.
    List,
    Help,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub scene: Scene,
    /// Render into an sRGB surface instead of a linear one.
    pub prefer_srgb: bool,
    /// `env_logger` filter; overrides `RUST_LOG`.
    pub log_filter: Option<String>,
}

/// Parses the arguments after the program name.
pub fn parse<I>(args: I) -> Result<CliCommand>
where
    I: IntoIterator<Item = String>,
{
    let mut options = RunOptions::default();
    let mut scene_given = false;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliCommand::Help),
            "--list" => return Ok(CliCommand::List),
            "--srgb" => options.prefer_srgb = true,
            "--log" => {
                let filter = args.next().context("--log needs a filter, e.g. --log debug")?;
                options.log_filter = Some(filter);
            }
            flag if flag.starts_with('-') => bail!("unknown option `{flag}`\n\n{USAGE}"),
            name => {
                if scene_given {
                    bail!("only one scene can be shown, got `{name}` as well\n\n{USAGE}");
                }
                options.scene = name.parse()?;
                scene_given = true;
            }
        }
    }

    Ok(CliCommand::Run(options))
}
