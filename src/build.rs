mod environment;
mod marker;
mod nav;
mod output;
pub mod paths;
pub mod resolver;
mod template;

pub use environment::Environment;
pub use marker::parse_assignment;
pub use output::{OutputWriter, WriteOutcome};
pub use paths::{output_path_for, tool_dir};
pub use resolver::Resolver;
pub use template::TemplateStore;
