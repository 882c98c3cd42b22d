use flowcraft::cli::commands::{CliArgs, Commands};
use flowcraft::cli::handlers::{handle_generate, handle_name, handle_parse, logging_config};
use flowcraft::util::logging::init_logging;
use flowcraft::{FlowcraftConfig, VERSION};

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging(logging_config(&args, &FlowcraftConfig::default()));

    debug!("flowcraft v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Parse(parse_args) => handle_parse(parse_args),
        Commands::Name(name_args) => handle_name(name_args),
        Commands::Generate(generate_args) => handle_generate(generate_args, args.quiet),
    };

    std::process::exit(exit_code);
}
