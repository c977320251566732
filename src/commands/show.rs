use crate::{Args, build::tool_dir, commands::effective_config, config::Config};

pub fn run(args: &Args) -> Result<(), anyhow::Error> {
    let tool_dir = tool_dir()?;
    let config = effective_config(args, &tool_dir)?;

    print!("{}", render(&config)?);

    Ok(())
}

/// The config as it would appear in `stitch.yaml`.
fn render(config: &Config) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(config)
}
