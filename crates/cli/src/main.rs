mod replay;

use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;

/// Replay a JSON script of trimmer commands and print the emitted events.
#[derive(FromArgs, Debug)]
struct Args {
    /// path to a JSON array of commands
    #[argh(positional)]
    script: PathBuf,

    /// path to a JSON trimmer config; defaults apply when omitted
    #[argh(option)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_tracing();
    let args: Args = argh::from_env();

    match replay::run(&args.script, args.config.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("trimmer-cli: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
