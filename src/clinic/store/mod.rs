//! # Storage Layer
//!
//! Records live in three flat text files, one record per line (see [`codec`] for the
//! formats). The [`StorageBackend`] trait only moves *lines* in and out; it never sees a
//! `Patient` or an `Appointment`. That keeps the line format in one place and lets the
//! same codec run against both backends:
//!
//! - [`fs::FsBackend`]: production, files under the data directory.
//! - [`memory::MemBackend`]: line buffers in memory, for tests.
//!
//! ## Write policy
//!
//! Creating a record appends one line. Any other mutation rewrites the whole file from
//! the in-memory collection. Backends open and close files inside each call.
//!
//! ## Load policy
//!
//! Loading is best effort: a line that does not decode is skipped and counted in
//! [`Loaded::skipped`], it never stops the rest of the file from loading.

use crate::error::Result;
use crate::model::{Appointment, Patient, Prescription};
use std::fmt;
use std::path::PathBuf;

pub mod codec;
pub mod fs;
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Patients,
    Appointments,
    Prescriptions,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Patients => write!(f, "patients"),
            RecordKind::Appointments => write!(f, "appointments"),
            RecordKind::Prescriptions => write!(f, "prescriptions"),
        }
    }
}

/// Raw line I/O for the record files plus the generated prescription documents.
pub trait StorageBackend {
    /// All lines of a record file. A missing file is an empty list.
    fn read_lines(&self, kind: RecordKind) -> Result<Vec<String>>;

    /// Appends one line to a record file, creating it if needed.
    fn append_line(&self, kind: RecordKind, line: &str) -> Result<()>;

    /// Replaces the whole record file.
    fn write_lines(&self, kind: RecordKind, lines: &[String]) -> Result<()>;

    /// Stores a generated document and returns where it ended up.
    fn write_document(&self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

/// Records decoded from one file, with the count of lines that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: 0,
        }
    }
}

/// Everything read at startup.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub patients: Loaded<Patient>,
    pub appointments: Loaded<Appointment>,
    pub prescriptions: Loaded<Prescription>,
    /// Value of a legacy `countId:` line in the appointments file, if any.
    pub appointment_counter: Option<u32>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.patients.skipped + self.appointments.skipped + self.prescriptions.skipped
    }
}

pub fn load_all<B: StorageBackend>(backend: &B) -> Result<LoadReport> {
    let patients = decode_lines(backend.read_lines(RecordKind::Patients)?, codec::decode_patient);

    let mut appointment_counter = None;
    let appointment_lines: Vec<String> = backend
        .read_lines(RecordKind::Appointments)?
        .into_iter()
        .filter(|line| match codec::decode_legacy_counter(line) {
            Some(count) => {
                appointment_counter = Some(count);
                false
            }
            None => true,
        })
        .collect();
    let appointments = decode_lines(appointment_lines, codec::decode_appointment);

    let prescriptions = decode_lines(
        backend.read_lines(RecordKind::Prescriptions)?,
        codec::decode_prescription,
    );

    for (kind, skipped) in [
        (RecordKind::Patients, patients.skipped),
        (RecordKind::Appointments, appointments.skipped),
        (RecordKind::Prescriptions, prescriptions.skipped),
    ] {
        if skipped > 0 {
            tracing::warn!(%kind, skipped, "skipped malformed lines while loading");
        }
    }

    Ok(LoadReport {
        patients,
        appointments,
        prescriptions,
        appointment_counter,
    })
}

fn decode_lines<T>(lines: Vec<String>, decode: fn(&str) -> Option<T>) -> Loaded<T> {
    let mut loaded = Loaded::default();
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        match decode(line) {
            Some(record) => loaded.records.push(record),
            None => {
                tracing::debug!(line = %line, "dropping unreadable line");
                loaded.skipped += 1;
            }
        }
    }
    loaded
}
