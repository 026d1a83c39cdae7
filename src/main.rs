use clap::{crate_version, App, Arg, ArgMatches};
use log::{error, info};
use pagesmith::build::{build_site, Error as BuildError};
use pagesmith::config::{Config, Error as ConfigError};
use std::fmt;
use std::path::Path;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("pagesmith")
        .version(crate_version!())
        .about("Renders markdown documents with JSON meta blocks into HTML pages")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .help("The configuration file (defaults to the file named by $CONFIG)"),
        )
        .arg(
            Arg::with_name("keep-going")
                .short("k")
                .long("keep-going")
                .help("Keep processing documents after one fails"),
        )
        .arg(
            Arg::with_name("sort")
                .long("sort")
                .help("Process documents in file name order"),
        )
        .get_matches();

    if let Err(e) = run(&matches) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let mut config = match matches.value_of("config") {
        Some(path) => Config::from_file(Path::new(path)),
        None => Config::from_env(),
    }?;
    if matches.is_present("keep-going") {
        config.fail_fast = false;
    }
    if matches.is_present("sort") {
        config.sort_by_name = true;
    }
    info!("configuration was loaded");

    config.check_input()?;
    info!("input directory found");
    config.check_output()?;
    info!("output directory found");

    let report = build_site(&config)?;
    info!("wrote {} pages and the index", report.index.links.len());
    match report.failures.len() {
        0 => Ok(()),
        failed => Err(Error::Failures(failed)),
    }
}

/// Everything that ends a run with a non-zero exit code.
#[derive(Debug)]
enum Error {
    Config(ConfigError),
    Build(BuildError),

    /// Some documents failed in keep-going mode. Each was already logged.
    Failures(usize),
}

impl Error {
    fn exit_code(&self) -> i32 {
        match self {
            Error::Config(err) => err.exit_code(),
            Error::Build(_) => 1,
            Error::Failures(_) => 1,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(err) => err.fmt(f),
            Error::Build(err) => err.fmt(f),
            Error::Failures(n) => write!(f, "{} document(s) failed to render", n),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Error {
        Error::Config(err)
    }
}

impl From<BuildError> for Error {
    fn from(err: BuildError) -> Error {
        Error::Build(err)
    }
}
