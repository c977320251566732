pub mod build;
pub mod show;

use std::path::Path;

use tracing::debug;

use crate::{
    Args,
    build::parse_assignment,
    config::{Config, ExistingOutput},
};

/// Load the config and apply command line overrides on top of it.
pub fn effective_config(args: &Args, tool_dir: &Path) -> Result<Config, anyhow::Error> {
    let loaded = Config::load_from_arg(args.config_file.as_deref(), tool_dir)?;
    match &loaded.source {
        Some(path) => debug!("loaded config from {}", path.display()),
        None => debug!("no config file, using defaults"),
    }

    apply_overrides(args, loaded.config)
}

/// Apply command line flags on top of a loaded config.
fn apply_overrides(args: &Args, mut config: Config) -> Result<Config, anyhow::Error> {
    if let Some(dir) = &args.template_dir {
        config.templates = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output = Some(dir.clone());
    }
    if let Some(syntax) = args.syntax {
        config.syntax = syntax;
    }
    if args.overwrite {
        config.existing_output = ExistingOutput::Overwrite;
    }
    for var in &args.vars {
        let (key, value) = parse_assignment(var)?;
        config.vars.insert(key, value);
    }

    Ok(config)
}
