use clap::Parser;
use std::process::ExitCode;

use cbind_cli::{resolve_template_dir, run, write_outputs, CliError, Options};

fn main() -> ExitCode {
    let options = Options::parse();

    match try_main(&options) {
        Ok(()) => ExitCode::from(0),
        Err(err) => {
            eprintln!("Exception during conversion:");
            eprintln!("{err:#}");
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn try_main(options: &Options) -> Result<(), CliError> {
    let template_dir = resolve_template_dir(options);

    let output = run(options, |message| println!("{message}"))?;
    write_outputs(options, &template_dir, &output)?;
    println!("Done");

    Ok(())
}
