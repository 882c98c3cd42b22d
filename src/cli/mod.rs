pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, GenerateArgs, NameArgs, ParseArgs};
pub use output::{GeneratedPipeline, OutputFormat, OutputFormatter};
