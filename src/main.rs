use anyhow::Context;
use shellpad::clipboard::MemoryClipboard;
use shellpad::{config, error, logging, App, Config, TuiApplication};

const USAGE: &str = "\
Usage: shellpad [NOTEBOOK]

Arguments:
  NOTEBOOK       notebook file (overrides notebook_file in the config)

Options:
  -h, --help     print this help
  -V, --version  print version

Environment:
  SHELLPAD_LOG   log level (error, warn, info, debug, trace)";

enum Invocation {
    Run { notebook: Option<String> },
    Help,
    Version,
}

fn parse_args(args: &[String]) -> anyhow::Result<Invocation> {
    let mut notebook = None;
    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            flag if flag.starts_with('-') => anyhow::bail!("unknown option: {}\n\n{}", flag, USAGE),
            path => {
                if notebook.replace(path.to_string()).is_some() {
                    anyhow::bail!("only one notebook file may be given\n\n{}", USAGE);
                }
            }
        }
    }
    Ok(Invocation::Run { notebook })
}

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let notebook = match parse_args(&args)? {
        Invocation::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Invocation::Version => {
            println!("shellpad {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Invocation::Run { notebook } => notebook,
    };

    if let Some(dir) = config::config_dir() {
        let level = logging::level_from_env(std::env::var(logging::LOG_LEVEL_ENV).ok().as_deref());
        logging::init(&dir.join(logging::LOG_FILE_NAME), level);
    }

    let mut config = Config::load().context("failed to load configuration")?;
    if let Some(path) = notebook {
        config = config
            .with_notebook_file(&path)
            .with_context(|| format!("invalid notebook path: {}", path))?;
    }
    log::info!("starting shellpad with {}", config.notebook_file.display());

    let notebook_file = config.notebook_file.clone();
    let app = App::new(config, Box::new(MemoryClipboard::new()))
        .with_context(|| format!("failed to open notebook {}", notebook_file.display()))?;
    TuiApplication::new(app).run().context("terminal session failed")?;
    Ok(())
}
