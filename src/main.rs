use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use genbranch::cli::{Cli, Commands};
use genbranch::error::exit_code_for;
use genbranch::git::Git;
use genbranch::output::{self, Verbosity};
use genbranch::prompt::{AssumeYes, Confirm, ConsolePrompt};
use genbranch::stage;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let verbosity = output::verbosity_from_flags(cli.quiet, cli.verbose);
    output::set_verbosity(verbosity);
    init_tracing(verbosity);

    if let Err(e) = run(cli) {
        output::error(&format!("Error: {e:#}"));
        process::exit(exit_code_for(&e));
    }
}

fn init_tracing(verbosity: Verbosity) {
    // Built from the flags only; the environment is never consulted.
    let filter = match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "genbranch=debug,warn",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        print_completions(*shell, &mut Cli::command());
        return Ok(());
    }

    let settings = cli.settings();
    let git = Git::locate(settings.strict)?;

    let mut confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ConsolePrompt::stdin())
    };

    stage::execute(
        &git,
        &settings,
        cli.directory.as_deref(),
        confirm.as_mut(),
    )?;
    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
