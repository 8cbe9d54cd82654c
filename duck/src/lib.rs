// The driver turns a command line into a run: it resolves the script path,
// refuses anything that is not a duck source file, reads it, and hands the
// text to the interpreter over the process's standard streams. Everything
// interesting happens in duck-eval; this crate should stay small.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};
use duck_base::{err, script_err, ErrorKind, Result};
use tracing::debug;

pub use duck_eval::{Config, Interpreter, Snapshot};


#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    pub script: PathBuf,
    pub wait: bool,
    pub snapshot: Option<PathBuf>,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Args> {
        let mut script = None;
        let mut wait = false;
        let mut snapshot = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--wait" => wait = true,
                "--snapshot" => match args.next() {
                    Some(file) => snapshot = Some(PathBuf::from(file)),
                    None => return Err(err("--snapshot needs a file argument")),
                },
                _ if script.is_none() => script = Some(PathBuf::from(arg)),
                _ => return Err(err(format!("unexpected argument: {}", arg))),
            }
        }
        let Some(script) = script else {
            return Err(script_err(ErrorKind::SourceFormat {
                reason: "no script given".to_string(),
            }));
        };
        Ok(Args {
            script,
            wait,
            snapshot,
        })
    }
}

/// Makes `path` absolute and checks it names a duck source file.
pub fn source_path(path: &Path, config: &Config) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    if path.extension().and_then(OsStr::to_str) != Some(config.source_extension.as_str()) {
        return Err(script_err(ErrorKind::SourceFormat {
            reason: format!(
                "only duck files '.{}' can be interpreted: {}",
                config.source_extension,
                path.display()
            ),
        }));
    }
    Ok(path)
}

pub fn run_path(path: &Path, config: &Config) -> Result<Interpreter> {
    let path = source_path(path, config)?;
    let source = std::fs::read_to_string(&path)?;
    debug!(target: "duck", path = %path.display(), bytes = source.len(), "running script");
    let interp = Interpreter::new(&source, config.clone());
    interp.run()?;
    Ok(interp)
}

pub fn write_snapshot(interp: &Interpreter, path: &Path) -> Result<()> {
    let bytes = rmp_serde::to_vec(&interp.snapshot())?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn run(args: &Args) -> Result<()> {
    let mut config = Config::new();
    config.wait_for_threads = args.wait;
    let interp = run_path(&args.script, &config)?;
    if let Some(snapshot) = &args.snapshot {
        write_snapshot(&interp, snapshot)?;
    }
    Ok(())
}
