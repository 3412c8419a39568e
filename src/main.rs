// SPDX-License-Identifier: MPL-2.0
use iced_review::app::{self, paths, Flags};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const HELP: &str = "\
iced_review - frame-accurate video review

USAGE:
    iced_review [OPTIONS] [VIDEO]

ARGS:
    <VIDEO>                Video file to open on startup

OPTIONS:
    -a, --avi <PATH>       Video file to open on startup (same as VIDEO)
    --config-dir <DIR>     Directory holding settings.toml
                           (overrides ICED_REVIEW_CONFIG_DIR)
    -h, --help             Print this help and exit

ENVIRONMENT:
    RUST_LOG               tracing filter, overrides [logging] level
";

fn main() -> iced::Result {
    let flags = match parse_args(pico_args::Arguments::from_env()) {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    paths::init_cli_override(flags.config_dir.as_ref().map(PathBuf::from));

    let (config, warning) = iced_review::config::load();
    init_logging(&config.logging.level);
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    app::run(flags, config)
}

/// Parses the command line. `Ok(None)` means help was requested.
fn parse_args(mut args: pico_args::Arguments) -> Result<Option<Flags>, pico_args::Error> {
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let avi: Option<String> = args.opt_value_from_str(["-a", "--avi"])?;
    let config_dir: Option<String> = args.opt_value_from_str("--config-dir")?;
    let positional = args
        .finish()
        .into_iter()
        .next()
        .and_then(|s| s.into_string().ok());

    Ok(Some(Flags {
        file_path: avi.or(positional),
        config_dir,
    }))
}

/// `RUST_LOG` wins over the configured level; a bad directive falls back to `info`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(iced_review::config::DEFAULT_LOG_LEVEL));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn parse(args: &[&str]) -> Result<Option<Flags>, pico_args::Error> {
        parse_args(pico_args::Arguments::from_vec(
            args.iter().map(OsString::from).collect(),
        ))
    }

    #[test]
    fn avi_flag_wins_over_positional() {
        let flags = parse(&["-a", "a.avi", "b.mp4"]).unwrap().unwrap();
        assert_eq!(flags.file_path.as_deref(), Some("a.avi"));
    }

    #[test]
    fn positional_path_and_config_dir() {
        let flags = parse(&["--config-dir", "/tmp/cfg", "clip.mp4"])
            .unwrap()
            .unwrap();
        assert_eq!(flags.file_path.as_deref(), Some("clip.mp4"));
        assert_eq!(flags.config_dir.as_deref(), Some("/tmp/cfg"));
    }

    #[test]
    fn no_arguments_is_valid() {
        let flags = parse(&[]).unwrap().unwrap();
        assert!(flags.file_path.is_none());
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse(&["--help", "--avi"]).unwrap().is_none());
    }

    #[test]
    fn flag_without_value_is_an_error() {
        assert!(parse(&["--avi"]).is_err());
        assert!(parse(&["--config-dir"]).is_err());
    }
}
