//! Process-wide logger: stderr plus an optional append-only file.

use env_logger::{Env, Target};
use log::Level;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Writes every log line to stderr and to the log file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// `<timestamp> - <LEVEL> - <message>`
fn write_line(
    out: &mut impl Write,
    timestamp: impl fmt::Display,
    level: Level,
    message: &fmt::Arguments<'_>,
) -> io::Result<()> {
    writeln!(out, "{} - {} - {}", timestamp, level, message)
}

/// Install the global logger. Call once, before the server starts.
///
/// Lines are formatted `<timestamp> - <LEVEL> - <message>`; the default filter
/// is `info` unless `RUST_LOG` says otherwise.
pub fn init(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| {
        write_line(
            buf,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            record.level(),
            record.args(),
        )
    });
    if let Some(path) = log_file {
        let file = open_log_file(path)?;
        builder.target(Target::Pipe(Box::new(Tee { file })));
    }
    builder.init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_log_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("upload_logs.log");
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "first").unwrap();
        drop(file);
        let mut file = open_log_file(&path).unwrap();
        writeln!(file, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn lines_carry_timestamp_and_level() {
        let mut out = Vec::new();
        write_line(
            &mut out,
            "2024-03-01 10:00:00,123",
            Level::Warn,
            &format_args!("[{}] departments line {}: skipping row", "abc", 2),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2024-03-01 10:00:00,123 - WARN - [abc] departments line 2: skipping row\n"
        );
    }

    #[test]
    fn tee_copies_lines_to_the_log_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload_logs.log");
        let mut tee = Tee {
            file: open_log_file(&path).unwrap(),
        };
        write_line(
            &mut tee,
            "2024-03-01 10:00:00,000",
            Level::Info,
            &format_args!("valid records loaded"),
        )
        .unwrap();
        tee.flush().unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2024-03-01 10:00:00,000 - INFO - valid records loaded\n"
        );
    }
}
