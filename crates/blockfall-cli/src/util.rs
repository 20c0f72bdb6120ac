use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context as _;
use log::{LevelFilter, Log, Metadata, Record};
use serde::{Serialize, de::DeserializeOwned};

/// Parses a JSON file; `file_kind` names the file in error messages.
pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {file_kind} file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {file_kind} JSON file: {}", path.display()))
}

/// Writes `value` as pretty JSON to `path`, or to stdout without a path.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize,
{
    let (mut writer, target): (Box<dyn Write>, String) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer).with_context(|| format!("Failed to write JSON to {target}"))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush output to {target}"))
}

/// Writes engine log records to stderr, for hosts that do not own the terminal.
#[derive(Debug)]
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    #[must_use]
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Installs the logger for the rest of the process.
    pub fn install(level: LevelFilter) -> anyhow::Result<()> {
        log::set_boxed_logger(Box::new(Self::new(level)))
            .context("Failed to install the logger")?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        _ = io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use blockfall_engine::GameConfig;

    use super::*;

    #[test]
    fn test_json_file_round_trip() {
        let path = env::temp_dir().join(format!("blockfall-config-{}.json", process::id()));
        let config = GameConfig {
            lock_delay_ticks: 2,
            ..GameConfig::default()
        };
        write_json(&config, Some(path.as_path())).unwrap();
        let read: GameConfig = read_json_file("game config", &path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(read, config);
    }

    #[test]
    fn test_missing_file_names_kind() {
        let path = env::temp_dir().join("blockfall-does-not-exist.json");
        let err = read_json_file::<GameConfig, _>("game config", &path).unwrap_err();
        assert!(err.to_string().contains("game config"));
    }

    #[test]
    fn test_stderr_logger_filters_by_level() {
        let logger = StderrLogger::new(LevelFilter::Warn);
        let at = |level| Metadata::builder().level(level).target("blockfall").build();
        assert!(logger.enabled(&at(log::Level::Error)));
        assert!(logger.enabled(&at(log::Level::Warn)));
        assert!(!logger.enabled(&at(log::Level::Info)));
        assert!(!logger.enabled(&at(log::Level::Debug)));

        let off = StderrLogger::new(LevelFilter::Off);
        assert!(!off.enabled(&at(log::Level::Error)));
    }
}
