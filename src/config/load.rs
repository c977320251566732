//! Configuration loading from files and the environment.

use std::path::{Path, PathBuf};

use super::{Config, ConfigError, DEFAULT_CONFIG_FILE, ENV_PREFIX};
use crate::build::paths::base_path_from_config;

/// A loaded config and the file it came from.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// The config file that was read, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Load the config from the command line argument, falling back to
    /// `stitch.yaml` in `default_dir` when it exists.
    ///
    /// An explicitly named file must exist. Relative paths inside the config
    /// are resolved against the file's directory, or `default_dir` when no
    /// file was read.
    pub fn load_from_arg(
        config_file: Option<&Path>,
        default_dir: &Path,
    ) -> Result<LoadedConfig, ConfigError> {
        Self::load_from_arg_with_env(config_file, default_dir, None)
    }

    /// Like [`Config::load_from_arg`], reading `STITCH_*` overrides from
    /// `env_vars` instead of the process environment when given.
    pub fn load_from_arg_with_env(
        config_file: Option<&Path>,
        default_dir: &Path,
        env_vars: Option<config::Map<String, String>>,
    ) -> Result<LoadedConfig, ConfigError> {
        let source = match config_file {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(default_dir.join(DEFAULT_CONFIG_FILE)).filter(|p| p.is_file()),
        };

        let config = Self::load(source.as_deref(), env_vars)?;
        let base = source
            .as_deref()
            .map(base_path_from_config)
            .unwrap_or_else(|| default_dir.to_path_buf());

        Ok(LoadedConfig {
            config: config.resolve_paths(&base),
            source,
        })
    }

    /// Layer the optional YAML file and `STITCH_*` environment variables.
    fn load(
        path: Option<&Path>,
        env_vars: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            let path_str = path
                .as_os_str()
                .to_str()
                .ok_or_else(|| ConfigError::EncodePath(path.to_path_buf()))?;
            builder = builder.add_source(config::File::new(path_str, config::FileFormat::Yaml));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env_vars),
            )
            .build()?
            .try_deserialize::<Config>()?;

        config.validate()?;
        Ok(config)
    }
}
