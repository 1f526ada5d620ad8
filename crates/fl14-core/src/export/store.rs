use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Fl14Error;
use crate::export::TableSink;
use crate::model::OutputRow;

/// Number of variables in a format table: start, label, fmtname, type.
const FORMAT_TABLE_VARIABLES: usize = 4;

/// An open connection to one library of a format store.
pub trait StoreSession {
    fn write_table(&mut self, table: &str, rows: &[OutputRow]) -> Result<(), Fl14Error>;

    /// Everything the session has logged so far.
    fn last_log(&self) -> Result<String, Fl14Error>;

    fn disconnect(&mut self) -> Result<(), Fl14Error>;
}

/// A store of libraries holding format tables.
pub trait FormatStore {
    fn connect(&self, library: &str) -> Result<Box<dyn StoreSession>, Fl14Error>;
}

/// Disconnects the wrapped session when dropped, unless already closed.
struct SessionGuard {
    session: Box<dyn StoreSession>,
    closed: bool,
}

impl SessionGuard {
    fn new(session: Box<dyn StoreSession>) -> Self {
        SessionGuard {
            session,
            closed: false,
        }
    }

    fn close(mut self) -> Result<(), Fl14Error> {
        self.closed = true;
        self.session.disconnect()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.session.disconnect() {
            tracing::warn!(error = %e, "store session did not disconnect cleanly");
        }
    }
}

/// Writes the table into a format store and waits for the session log to confirm it.
pub struct StoreSink {
    store: Box<dyn FormatStore>,
    library: String,
    table: String,
    confirm_marker: String,
    poll_interval: Duration,
    max_attempts: u32,
}

impl StoreSink {
    pub fn new(
        store: Box<dyn FormatStore>,
        library: impl Into<String>,
        table: impl Into<String>,
        confirm_marker: impl Into<String>,
        poll_interval: Duration,
        max_attempts: u32,
    ) -> Self {
        StoreSink {
            store,
            library: library.into(),
            table: table.into(),
            confirm_marker: confirm_marker.into(),
            poll_interval,
            max_attempts,
        }
    }

    /// Poll the session log until the confirmation marker shows up.
    /// Returns the attempt on which it was seen.
    fn await_confirmation(&self, session: &dyn StoreSession) -> Result<u32, Fl14Error> {
        for attempt in 1..=self.max_attempts {
            if session.last_log()?.contains(&self.confirm_marker) {
                return Ok(attempt);
            }
            tracing::debug!(attempt, max = self.max_attempts, "waiting for store confirmation");
            if attempt < self.max_attempts {
                std::thread::sleep(self.poll_interval);
            }
        }

        Err(Fl14Error::ExportTimeout {
            table: format!("{}.{}", self.library, self.table),
            attempts: self.max_attempts,
        })
    }
}

impl TableSink for StoreSink {
    fn name(&self) -> &str {
        "format-store"
    }

    fn write(&self, rows: &[OutputRow]) -> Result<(), Fl14Error> {
        let mut guard = SessionGuard::new(self.store.connect(&self.library)?);
        guard.session.write_table(&self.table, rows)?;

        let attempt = self.await_confirmation(guard.session.as_ref())?;
        tracing::info!(
            library = %self.library,
            table = %self.table,
            attempt,
            "store write confirmed"
        );

        guard.close()
    }
}

/// A format store on the local filesystem.
///
/// Each library is a directory under `root`; each table is `<table>.json`.
/// Every session starts a fresh `session.log` in its library directory.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectoryStore { root: root.into() }
    }

    pub fn table_path(&self, library: &str, table: &str) -> PathBuf {
        self.root.join(library).join(format!("{table}.json"))
    }
}

impl FormatStore for DirectoryStore {
    fn connect(&self, library: &str) -> Result<Box<dyn StoreSession>, Fl14Error> {
        validate_member_name("library", library)?;

        let dir = self.root.join(library);
        fs::create_dir_all(&dir)?;
        let log_path = dir.join("session.log");
        File::create(&log_path)?;

        let mut session = DirectorySession {
            dir,
            library: library.to_string(),
            log_path,
            connected: true,
        };
        session.log(&format!(
            "NOTE: Libref {} was successfully assigned.",
            library.to_uppercase()
        ))?;
        tracing::debug!(library, "store session connected");
        Ok(Box::new(session))
    }
}

struct DirectorySession {
    dir: PathBuf,
    library: String,
    log_path: PathBuf,
    connected: bool,
}

impl DirectorySession {
    fn log(&mut self, line: &str) -> Result<(), Fl14Error> {
        let mut file = OpenOptions::new().append(true).open(&self.log_path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    fn ensure_connected(&self) -> Result<(), Fl14Error> {
        if self.connected {
            Ok(())
        } else {
            Err(Fl14Error::Export(format!(
                "session for library '{}' is disconnected",
                self.library
            )))
        }
    }
}

impl StoreSession for DirectorySession {
    fn write_table(&mut self, table: &str, rows: &[OutputRow]) -> Result<(), Fl14Error> {
        self.ensure_connected()?;
        validate_member_name("table", table)?;

        let path = self.dir.join(format!("{table}.json"));
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, rows)?;

        self.log(&format!(
            "NOTE: The data set {}.{} has {} observations and {} variables.",
            self.library.to_uppercase(),
            table.to_uppercase(),
            rows.len(),
            FORMAT_TABLE_VARIABLES
        ))
    }

    fn last_log(&self) -> Result<String, Fl14Error> {
        Ok(fs::read_to_string(&self.log_path)?)
    }

    fn disconnect(&mut self) -> Result<(), Fl14Error> {
        if !self.connected {
            return Ok(());
        }
        self.log("NOTE: Session disconnected.")?;
        self.connected = false;
        tracing::debug!(library = %self.library, "store session disconnected");
        Ok(())
    }
}

/// Library and table names: 1 to 32 ASCII letters, digits or underscores,
/// not starting with a digit.
fn validate_member_name(kind: &str, name: &str) -> Result<(), Fl14Error> {
    let valid = !name.is_empty()
        && name.len() <= 32
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Fl14Error::Export(format!("invalid {kind} name '{name}'")))
    }
}

/// Load a table previously written by [`DirectoryStore`].
pub fn read_table(path: &Path) -> Result<Vec<OutputRow>, Fl14Error> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
