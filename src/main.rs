use anyhow::{ensure, Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;

use oci_tar_index::{ArchiveWalker, Notifier};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(help = "Path to the oci-archive tarball to index")]
    archive: PathBuf,

    #[arg(
        short,
        long,
        help = "Abort on the first unparsable layer blob instead of skipping it"
    )]
    strict: bool,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Verbose mode (-v for info, -vv for debug, -vvv for trace). Also switches off the spinner"
    )]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let notifier = Notifier::new(cli.verbose);

    // Argument validation happens before any archive processing.
    ensure!(
        cli.archive.exists(),
        "archive does not exist: {}",
        cli.archive.display()
    );
    ensure!(
        cli.archive.is_file(),
        "path is not a regular file: {}",
        cli.archive.display()
    );

    let index = ArchiveWalker::new(&notifier)
        .strict(cli.strict)
        .index_path(&cli.archive)
        .with_context(|| format!("failed to index {}", cli.archive.display()))?;

    notifier.finish();
    index
        .write_pretty(io::stdout().lock())
        .context("failed to write index to stdout")?;

    Ok(())
}
