//! Command-line configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::api::websocket::state::DEFAULT_RELOAD_PATH;
use crate::error::{Error, Result};
use crate::watcher::filter::{FilterSet, DEFAULT_EXCLUDE, DEFAULT_INCLUDE};

/// Serve a directory and reload browsers when its files change
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory to serve and watch
    #[arg(short = 'd', long = "dir", env = "LIVEWATCH_DIR", default_value = ".")]
    pub root: PathBuf,

    /// Address to serve on (`:port` listens on all interfaces)
    #[arg(short, long, env = "LIVEWATCH_ADDR", default_value = ":8000")]
    pub addr: String,

    /// Milliseconds between two change checks
    #[arg(
        short = 't',
        long = "interval",
        env = "LIVEWATCH_INTERVAL",
        default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Comma-separated regexes of file names to ignore. A dot means "any
    /// char", escape it to match a real dot. The default skips hidden files.
    #[arg(short = 'f', long, env = "LIVEWATCH_EXCLUDE", default_value = DEFAULT_EXCLUDE)]
    pub exclude: String,

    /// Comma-separated regexes of file names to watch
    #[arg(short, long, env = "LIVEWATCH_INCLUDE", default_value = DEFAULT_INCLUDE)]
    pub include: String,

    /// Path of the reload socket; the script is served at `<path>.js`
    #[arg(short, long, env = "LIVEWATCH_PATH", default_value = DEFAULT_RELOAD_PATH)]
    pub path: String,

    /// Log level
    #[arg(long, env = "LIVEWATCH_LOG", default_value = "info")]
    pub log_level: String,
}

/// Validated settings consumed by the server and the watch loop
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub addr: String,
    pub interval: Duration,
    pub filter: FilterSet,
    pub reload_path: String,
}

impl Config {
    /// Compile patterns and resolve the root; any failure is fatal
    pub fn from_args(args: &Args) -> Result<Self> {
        let filter = FilterSet::from_csv(&args.include, &args.exclude)?;
        let root = args
            .root
            .canonicalize()
            .map_err(|source| Error::InvalidRoot {
                path: args.root.clone(),
                source,
            })?;
        if !root.is_dir() {
            return Err(Error::InvalidRoot {
                path: args.root.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        Ok(Self {
            root,
            addr: listen_addr(&args.addr),
            interval: Duration::from_millis(args.interval_ms),
            filter,
            reload_path: args.path.clone(),
        })
    }
}

/// Expand the `:port` shorthand into a bindable address
pub fn listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}
