//! # Command Layer
//!
//! One function per verb, grouped by record type. Each takes the
//! [`ManagementSystem`](crate::system::ManagementSystem) and typed arguments and returns
//! a [`CmdResult`]: the records to show plus leveled messages. Nothing here prints.

use crate::model::{Appointment, Patient, Prescription};
use std::path::PathBuf;

pub mod appointments;
pub mod history;
pub mod patients;
pub mod prescriptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a command wants shown, and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Listing {
    #[default]
    Nothing,
    /// One row per patient.
    PatientTable(Vec<Patient>),
    /// Every field of each patient.
    PatientDetails(Vec<Patient>),
    /// Name, NRIC and medical history of each patient.
    Histories(Vec<Patient>),
    Appointments(Vec<Appointment>),
    Prescriptions(Vec<Prescription>),
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub listing: Listing,
    /// Path of a document written by the command, if any.
    pub document: Option<PathBuf>,
    pub messages: Vec<CmdMessage>,
    /// Set by `bye`: the caller should stop reading commands.
    pub exit: bool,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_listing(mut self, listing: Listing) -> Self {
        self.listing = listing;
        self
    }

    pub fn with_document(mut self, path: PathBuf) -> Self {
        self.document = Some(path);
        self
    }

    pub fn exit() -> Self {
        Self {
            exit: true,
            ..Default::default()
        }
    }
}
