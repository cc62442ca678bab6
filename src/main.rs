use std::{
    env,
    fs::read_to_string,
    io::{self, Read},
    path::PathBuf,
    process,
    time::Instant,
};

use ifjc::{errors::errors::EXIT_INTERNAL, parse_with, render_diagnostic, ParserConfig};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: ifjc [--strict] [--print] [FILE]";

struct Options {
    path: Option<PathBuf>,
    strict: bool,
    print: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}\n{}", message, USAGE);
            process::exit(EXIT_INTERNAL);
        }
    };

    let (source, file_name) = match read_source(options.path.as_ref()) {
        Ok(read) => read,
        Err(err) => {
            error!(%err, "failed to read input");
            eprintln!("Error: failed to read input: {}", err);
            process::exit(EXIT_INTERNAL);
        }
    };

    let config = if options.strict {
        ParserConfig::strict()
    } else {
        ParserConfig::default()
    };

    let start = Instant::now();
    let output = parse_with(&source, &config);
    debug!(elapsed = ?start.elapsed(), "parsed");

    for diagnostic in &output.diagnostics {
        eprint!("{}", render_diagnostic(diagnostic, &source, &file_name));
    }

    if options.print && output.is_success() {
        print!("{}", output.program);
    }

    process::exit(output.exit_code());
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        path: None,
        strict: false,
        print: false,
    };

    for arg in args {
        match arg.as_str() {
            "--strict" => options.strict = true,
            "--print" => options.print = true,
            "-" => options.path = None,
            flag if flag.starts_with("--") => return Err(format!("unknown option `{}`", flag)),
            path => {
                if options.path.is_some() {
                    return Err(String::from("only one input file is accepted"));
                }
                options.path = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

/// Reads the whole program from `path`, or from stdin when there is none.
fn read_source(path: Option<&PathBuf>) -> io::Result<(String, String)> {
    match path {
        Some(path) => {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            Ok((read_to_string(path)?, file_name))
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((source, String::from("stdin")))
        }
    }
}
