use clap::{
    crate_authors, crate_description, crate_name, crate_version, value_parser, Arg, ArgAction,
    ArgMatches, Command,
};
use scaffy::{config::Config, ScaffoldError, ScaffoldOptions};
use std::path::PathBuf;

const STRUCTURE_ENV: &str = "SCAFFY_STRUCTURE";

fn cli() -> Command {
    Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .help("Root path for creating the folder structure")
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("structure")
                .short('s')
                .long("structure")
                .help("File containing the folder structure, one entry per line")
                .env(STRUCTURE_ENV)
                .value_parser(value_parser!(PathBuf))
                .required(true),
        )
        .arg(
            Arg::new("module")
                .short('m')
                .long("module")
                .help("Module identifier passed to the module initializer"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML file configuring the module command and source stamping")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("no-mod-init")
                .long("no-mod-init")
                .help("Skip module initialization")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-stamp")
                .long("no-stamp")
                .help("Skip stamping source files with a declaration line")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-partial")
                .long("keep-partial")
                .help("Keep whatever was created when a run fails instead of removing it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Preview the layout without touching the filesystem")
                .action(ArgAction::SetTrue),
        )
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() {
    let matches = cli().get_matches();

    init_logger(matches.get_flag("verbose"));

    if let Err(error) = run(&matches) {
        let code = error.exit_code();

        eprintln!("{:?}", miette::Report::new(error));

        std::process::exit(code);
    }
}

fn init_logger(is_verbose: bool) {
    let level = if is_verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: &ArgMatches) -> Result<(), ScaffoldError> {
    let root = args.get_one::<PathBuf>("path").cloned().unwrap_or_default();
    let structure = args
        .get_one::<PathBuf>("structure")
        .cloned()
        .unwrap_or_default();

    let mut options = ScaffoldOptions::new(root, structure);

    if let Some(path) = args.get_one::<PathBuf>("config") {
        options.config = Config::from_file(path)?;
    }

    options.module = args.get_one::<String>("module").cloned();
    options.init_module = !args.get_flag("no-mod-init");
    options.stamp = !args.get_flag("no-stamp");
    options.rollback_on_failure = !args.get_flag("keep-partial");
    options.dry_run = args.get_flag("dry-run");

    log::debug!("scaffolding {}", options.root.display());

    let summary = scaffy::scaffold(&options)?;

    if let Some(report) = summary.stamp {
        for failure in report.failures {
            eprintln!("{:?}", miette::Report::new(failure));
        }
    }

    Ok(())
}
