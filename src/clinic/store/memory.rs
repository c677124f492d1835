use super::{RecordKind, StorageBackend};
use crate::error::{ClinicError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since the clinic is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    files: RefCell<HashMap<RecordKind, Vec<String>>>,
    documents: RefCell<HashMap<String, String>>,
    appends: RefCell<usize>,
    rewrites: RefCell<usize>,
    simulate_write_error: RefCell<bool>,
    simulate_read_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a record file with raw lines.
    pub fn seed(&self, kind: RecordKind, lines: &[&str]) {
        self.files
            .borrow_mut()
            .insert(kind, lines.iter().map(|l| l.to_string()).collect());
    }

    pub fn lines(&self, kind: RecordKind) -> Vec<String> {
        self.files
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }

    pub fn document(&self, file_name: &str) -> Option<String> {
        self.documents.borrow().get(file_name).cloned()
    }

    /// Number of single-line appends so far.
    pub fn append_count(&self) -> usize {
        *self.appends.borrow()
    }

    /// Number of whole-file rewrites so far.
    pub fn rewrite_count(&self) -> usize {
        *self.rewrites.borrow()
    }

    /// Makes every write fail, for exercising error paths.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Makes every read fail, as an unreadable data directory would.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    fn check_writable(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(ClinicError::Store("simulated write failure".to_string()));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn read_lines(&self, kind: RecordKind) -> Result<Vec<String>> {
        if *self.simulate_read_error.borrow() {
            return Err(ClinicError::Store(format!("simulated read failure ({})", kind)));
        }
        Ok(self.lines(kind))
    }

    fn append_line(&self, kind: RecordKind, line: &str) -> Result<()> {
        self.check_writable()?;
        self.files
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(line.to_string());
        *self.appends.borrow_mut() += 1;
        Ok(())
    }

    fn write_lines(&self, kind: RecordKind, lines: &[String]) -> Result<()> {
        self.check_writable()?;
        self.files.borrow_mut().insert(kind, lines.to_vec());
        *self.rewrites.borrow_mut() += 1;
        Ok(())
    }

    fn write_document(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        self.check_writable()?;
        self.documents
            .borrow_mut()
            .insert(file_name.to_string(), contents.to_string());
        Ok(PathBuf::from("memory").join(file_name))
    }
}
