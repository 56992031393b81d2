use std::path::PathBuf;

use clap::Parser;

/// deskgui: a window with an embedded webview, driven from a worker thread.
#[derive(Parser, Debug)]
#[command(name = "deskgui", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `deskgui=debug`).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Window title override.
    #[arg(long)]
    pub title: Option<String>,

    /// Number of marshalled round trips the worker makes before closing.
    #[arg(long, default_value_t = 3)]
    pub worker_calls: u32,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["deskgui"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
        assert!(args.title.is_none());
        assert_eq!(args.worker_calls, 3);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "deskgui",
            "--config",
            "/tmp/deskgui.toml",
            "--log-level",
            "deskgui=trace",
            "--title",
            "Demo",
            "--worker-calls",
            "7",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/tmp/deskgui.toml")));
        assert_eq!(args.log_level.as_deref(), Some("deskgui=trace"));
        assert_eq!(args.title.as_deref(), Some("Demo"));
        assert_eq!(args.worker_calls, 7);
    }

    #[test]
    fn rejects_non_numeric_worker_calls() {
        assert!(Args::try_parse_from(["deskgui", "--worker-calls", "many"]).is_err());
    }
}
