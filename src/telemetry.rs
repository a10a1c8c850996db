use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex,
};

use env_logger::Env;
use log::Level;

/// Append-only file that keeps a copy of every error-level log line.
pub struct ErrorLog {
    file: Mutex<File>,
}

impl ErrorLog {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(ErrorLog {
            file: Mutex::new(file),
        })
    }

    pub fn append(&self, line: &str) {
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(file, "{}", line) {
            eprintln!("Failed to write to error log: {}", e);
        }
    }
}

/// env_logger on stderr with `info` as the default filter. Error records are
/// also appended to `error_log`.
pub fn init_logging(error_log: ErrorLog) {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(move |buf, record| {
            let timestamp = buf.timestamp();
            if record.level() == Level::Error {
                error_log.append(&format!("{} - {}", timestamp, record.args()));
            }

            writeln!(
                buf,
                "[{} {:<5} {}] {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
