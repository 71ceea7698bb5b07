use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use clap::{CommandFactory, Parser, error::ErrorKind};
use clap_complete::Shell;
use colored::Colorize;
use log::LevelFilter;
use probe_json::{FfmpegInspector, FfmpegLogLevel, Outcome, ProbeOptions};

const CLI_AFTER_HELP: &str = "Examples:\n  probe-json input.mp4\n  probe-json input.mkv --no-streams --output chapters.json\n  probe-json input.ts --log-level quiet --verbose\n  probe-json --completions zsh > _probe-json";

#[derive(Debug, Parser)]
#[command(
    name = "probe-json",
    version,
    about = "Describe a media container as ffprobe-compatible JSON",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Media file or URL to probe.
    #[arg(required_unless_present = "completions")]
    input: Option<String>,

    /// Write the document to this file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Leave the streams array out of the document.
    #[arg(long)]
    no_streams: bool,

    /// Leave the chapters array out of the document.
    #[arg(long)]
    no_chapters: bool,

    /// Leave the format object out of the document.
    #[arg(long)]
    no_format: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<FfmpegLogLevel>,

    /// Show debug logging on stderr.
    #[arg(long, short)]
    verbose: bool,

    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    fn options(&self) -> ProbeOptions {
        ProbeOptions::new()
            .with_streams(!self.no_streams)
            .with_chapters(!self.no_chapters)
            .with_format(!self.no_format)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

/// Returns `Ok(true)` when a success document was written.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "probe-json", &mut io::stdout());
        return Ok(true);
    }

    init_logging(cli.verbose);

    let options = cli.options();
    options.validate()?;
    let input = cli.input.as_deref().ok_or("missing input")?;

    let inspector = FfmpegInspector::new()?;
    if let Some(level) = cli.log_level {
        probe_json::set_ffmpeg_log_level(level);
    }

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(File::create(path).map_err(|error| {
            format!("cannot create {}: {error}", path.display())
        })?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);

    let outcome = probe_json::write_document(&inspector, input, &options, &mut out)?;
    out.flush()?;

    Ok(match outcome {
        Outcome::Success => true,
        Outcome::Failure(error) => {
            log::debug!("{error}");
            false
        }
    })
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            error.exit()
        }
        Err(error) => {
            let _ = error.print();
            std::process::exit(1);
        }
    };

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            std::process::exit(1);
        }
    }
}
