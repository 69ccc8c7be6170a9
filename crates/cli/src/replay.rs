use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{info, warn};
use trimmer::{Command, Trimmer, TrimmerConfig, TrimmerError};

#[derive(Debug)]
pub enum ReplayError {
    Io {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    Script {
        path: PathBuf,
        source: serde_json::Error,
    },
    Config(TrimmerError),
    Output(std::io::Error),
}

impl Display for ReplayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io {
                context,
                path,
                source,
            } => write!(f, "{context}: {} ({source})", path.display()),
            Self::Script { path, source } => {
                write!(f, "invalid command script {} ({source})", path.display())
            }
            Self::Config(err) => write!(f, "invalid config: {err}"),
            Self::Output(err) => write!(f, "failed to write output: {err}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Script { source, .. } => Some(source),
            Self::Config(err) => Some(err),
            Self::Output(err) => Some(err),
        }
    }
}

/// Replays `script_path` and writes one JSON line per command, then the final
/// selection and layout.
///
/// Commands the trimmer rejects are reported inline and do not stop the replay.
pub fn run(script_path: &Path, config_path: Option<&Path>) -> Result<(), ReplayError> {
    let config = match config_path {
        Some(path) => load_config(path)?,
        None => TrimmerConfig::default(),
    };
    let commands = load_script(script_path)?;
    let mut trimmer = Trimmer::with_config(config).map_err(ReplayError::Config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut rejected = 0usize;
    for (step, command) in commands.into_iter().enumerate() {
        let line = match trimmer.handle_command(command) {
            Ok(events) => json!({ "step": step, "events": events }),
            Err(error) => {
                warn!(step, %error, "command rejected");
                rejected += 1;
                json!({ "step": step, "error": error.to_string() })
            }
        };
        writeln!(out, "{line}").map_err(ReplayError::Output)?;
    }

    let summary = json!({
        "selection": trimmer.snapshot(),
        "layout": trimmer.layout(),
    });
    writeln!(out, "{summary}").map_err(ReplayError::Output)?;

    info!(script = %script_path.display(), rejected, "replay finished");
    Ok(())
}

fn load_config(path: &Path) -> Result<TrimmerConfig, ReplayError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        context: "failed to read config",
        path: path.to_path_buf(),
        source,
    })?;
    TrimmerConfig::from_json(&raw).map_err(ReplayError::Config)
}

fn load_script(path: &Path) -> Result<Vec<Command>, ReplayError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        context: "failed to read command script",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ReplayError::Script {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReplayError, load_script};

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "trimmer-cli-{}-{}-{name}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("system clock must be after unix epoch")
                .as_nanos()
        ));
        std::fs::write(&path, contents).expect("temp file should be writable");
        path
    }

    #[test]
    fn load_script_parses_tagged_commands() {
        let path = write_temp(
            "script.json",
            r#"[
                { "type": "load_asset", "timeline": { "duration_tl": 60000000, "content_width": 600.0, "visible_width": 600.0 } },
                { "type": "load_stream", "duration": { "value": 54000, "timescale": 600 }, "content_width": 1800.0, "visible_width": 600.0 },
                { "type": "drag", "point": "start", "phase": "begin" },
                { "type": "scroll", "offset": 12.0, "phase": { "dragging_ended": { "will_decelerate": false } } }
            ]"#,
        );

        let commands = load_script(&path).expect("script should parse");

        assert_eq!(commands.len(), 4);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_script_reports_malformed_json() {
        let path = write_temp("broken.json", "[{ \"type\": \"teleport\" }]");

        let result = load_script(&path);

        assert!(matches!(result, Err(ReplayError::Script { .. })));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_script_reports_missing_file() {
        let result = load_script(&PathBuf::from("/nonexistent/trimmer-script.json"));
        assert!(matches!(result, Err(ReplayError::Io { .. })));
    }
}
