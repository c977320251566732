use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::{
    Args,
    build::{Environment, OutputWriter, Resolver, TemplateStore, WriteOutcome, output_path_for, tool_dir},
    commands::effective_config,
    config::Config,
};

pub fn run(args: &Args, input: &Path) -> Result<(), anyhow::Error> {
    let tool_dir = tool_dir().context("failed to locate the stitch executable")?;
    let config = effective_config(args, &tool_dir)?;
    let output_dir = config.output.clone().unwrap_or(tool_dir);

    if args.stdout {
        let (html, _) = expand(&config, input, &output_dir)?;
        print!("{html}");
        return Ok(());
    }

    let outcome = expand_file(&config, input, &output_dir)?;
    match &outcome.backup {
        Some(backup) => println!(
            "Built {} (previous version saved to {})",
            outcome.path.display(),
            backup.display()
        ),
        None => println!("Built {}", outcome.path.display()),
    }

    Ok(())
}

/// Expand `input` and write it into `output_dir` under the same file name.
///
/// Nothing is written if expansion fails.
pub fn expand_file(
    config: &Config,
    input: &Path,
    output_dir: &Path,
) -> Result<WriteOutcome, anyhow::Error> {
    let (html, output_path) = expand(config, input, output_dir)?;

    let backup_dir = config
        .backup_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let outcome = OutputWriter::new(config.existing_output, backup_dir).write(&output_path, &html)?;
    info!("saved {}", outcome.path.display());

    Ok(outcome)
}

/// Expand `input`, returning the HTML and the path it belongs at.
fn expand(
    config: &Config,
    input: &Path,
    output_dir: &Path,
) -> Result<(String, PathBuf), anyhow::Error> {
    info!("processing {}", input.display());
    let doc = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let output_path = output_path_for(input, output_dir)
        .ok_or_else(|| anyhow::anyhow!("input has no file name: {}", input.display()))?;

    let templates = TemplateStore::new(&config.templates);
    debug!("templates from {}", templates.dir().display());

    let resolver = Resolver::new(templates, config.syntax.into())
        .with_nav(config.nav.clone())
        .with_max_iterations(config.max_iterations);

    let mut env = Environment::with_vars(config.vars.clone());
    if !env.is_empty() {
        debug!("starting with {} variable(s)", env.len());
    }

    let html = resolver
        .resolve(&doc, &mut env, &output_path)
        .with_context(|| format!("failed to expand {}", input.display()))?;

    Ok((html, output_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExistingOutput, Syntax};
    use tempfile::TempDir;

    struct Site {
        dir: TempDir,
        config: Config,
    }

    impl Site {
        fn new(templates: &[(&str, &str)]) -> Self {
            let dir = TempDir::new().unwrap();
            let template_dir = dir.path().join("template_src");
            std::fs::create_dir_all(&template_dir).unwrap();
            for (name, content) in templates {
                std::fs::write(template_dir.join(format!("{name}.template.html")), content)
                    .unwrap();
            }
            std::fs::create_dir_all(dir.path().join("pages")).unwrap();

            let config = Config {
                backup_dir: Some(dir.path().join("backups")),
                ..Config::default()
            }
            .resolve_paths(dir.path());

            Self { dir, config }
        }

        fn page(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join("pages").join(name);
            std::fs::write(&path, content).unwrap();
            path
        }

        fn out_dir(&self) -> PathBuf {
            self.dir.path().join("public")
        }
    }

    #[test]
    fn test_expand_file_writes_output() {
        let site = Site::new(&[
            (
                "header",
                "<ul>\n<li><a href=\"index.html\">Home</a></li>\n<li><a href=\"about.html\">About</a></li>\n</ul>\n",
            ),
            ("footer", "<footer>{{get year}}</footer>"),
        ]);
        let input = site.page(
            "about.html",
            "{{setenv year=2026}}\n{{include header}}<main>About</main>\n{{include footer}}\n",
        );

        let outcome = expand_file(&site.config, &input, &site.out_dir()).unwrap();

        assert_eq!(outcome.path, site.out_dir().join("about.html"));
        let html = std::fs::read_to_string(&outcome.path).unwrap();
        assert_eq!(
            html,
            "<ul>\n<li><a href=\"index.html\">Home</a></li>\n<li><a class=\"active\" href=\"about.html\">About</a></li>\n</ul>\n<main>About</main>\n<footer>2026</footer>\n"
        );
    }

    #[test]
    fn test_expand_file_missing_template_writes_nothing() {
        let site = Site::new(&[]);
        let input = site.page("index.html", "{{include missing}}");

        let err = expand_file(&site.config, &input, &site.out_dir()).unwrap_err();
        assert!(format!("{err:#}").contains("template not found"));
        assert!(!site.out_dir().join("index.html").exists());
    }

    #[test]
    fn test_expand_file_backs_up_previous_output() {
        let site = Site::new(&[]);
        let input = site.page("index.html", "<p>new</p>");
        std::fs::create_dir_all(site.out_dir()).unwrap();
        std::fs::write(site.out_dir().join("index.html"), "<p>old</p>").unwrap();

        let outcome = expand_file(&site.config, &input, &site.out_dir()).unwrap();

        let backup = outcome.backup.unwrap();
        assert!(backup.starts_with(site.dir.path().join("backups")));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "<p>old</p>");
        assert_eq!(
            std::fs::read_to_string(site.out_dir().join("index.html")).unwrap(),
            "<p>new</p>"
        );
    }

    #[test]
    fn test_expand_file_overwrite_and_bare_syntax() {
        let mut site = Site::new(&[("nav", "<nav>{{{inner}}}</nav>")]);
        site.config.syntax = Syntax::Bare;
        site.config.existing_output = ExistingOutput::Overwrite;
        let input = site.page("index.html", "{{{nav}}}<main></main>");
        std::fs::create_dir_all(site.out_dir()).unwrap();
        std::fs::write(site.out_dir().join("index.html"), "old").unwrap();

        let outcome = expand_file(&site.config, &input, &site.out_dir()).unwrap();

        assert!(outcome.backup.is_none());
        assert_eq!(
            std::fs::read_to_string(outcome.path).unwrap(),
            "<nav>{{{inner}}}</nav><main></main>"
        );
    }

    #[test]
    fn test_config_vars_seed_each_document() {
        let mut site = Site::new(&[]);
        site.config
            .vars
            .insert("site_name".to_string(), "Example".to_string());
        let first = site.page("a.html", "{{setenv local=1}}<h1>{{get site_name}}</h1>");
        let second = site.page("b.html", "<h1>{{get site_name}}</h1>[{{get local}}]");

        expand_file(&site.config, &first, &site.out_dir()).unwrap();
        let outcome = expand_file(&site.config, &second, &site.out_dir()).unwrap();

        assert_eq!(
            std::fs::read_to_string(outcome.path).unwrap(),
            "<h1>Example</h1>[]"
        );
    }

    #[test]
    fn test_expand_missing_input() {
        let site = Site::new(&[]);
        let err = expand_file(&site.config, &site.dir.path().join("nope.html"), &site.out_dir())
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
