use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Format of `dt/` + `t/` as typed by the user, and of appointment timestamps on disk.
pub const APPOINTMENT_TIME_FORMAT: &str = "%Y-%m-%d %H%M";
/// Format of prescription timestamps, both on disk and on screen.
pub const PRESCRIPTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub nric: String,
    pub name: String,
    pub dob: String,
    pub gender: String,
    pub address: String,
    pub phone: String,
    pub history: Vec<String>,
}

impl Patient {
    pub fn new(
        nric: impl Into<String>,
        name: impl Into<String>,
        dob: impl Into<String>,
        gender: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            nric: nric.into(),
            name: name.into(),
            dob: dob.into(),
            gender: gender.into(),
            address: address.into(),
            phone: phone.into(),
            history: Vec::new(),
        }
    }

    pub fn with_history(mut self, history: Vec<String>) -> Self {
        self.history = history;
        self
    }

    /// Overwrites every field the update carries.
    pub fn apply(&mut self, update: &PatientUpdate) {
        let fields = [
            (&mut self.name, &update.name),
            (&mut self.dob, &update.dob),
            (&mut self.gender, &update.gender),
            (&mut self.address, &update.address),
            (&mut self.phone, &update.phone),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }
    }
}

/// Replacement values for `edit-patient`. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientUpdate {
    pub nric: String,
    pub name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.dob.is_none()
            && self.gender.is_none()
            && self.address.is_none()
            && self.phone.is_none()
    }
}

/// Appointment identifier, shown as `A<seq>`.
///
/// Ordering is numeric on the sequence number, so `A2 < A10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AppointmentId(u32);

impl AppointmentId {
    pub fn new(seq: u32) -> Self {
        Self(seq)
    }

    pub fn seq(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

impl FromStr for AppointmentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix('A')
            .or_else(|| s.strip_prefix('a'))
            .ok_or_else(|| format!("Invalid appointment id: {}", s))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Invalid appointment id: {}", s));
        }
        digits
            .parse()
            .map(AppointmentId)
            .map_err(|_| format!("Invalid appointment id: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub nric: String,
    pub at: NaiveDateTime,
    pub description: String,
    pub is_done: bool,
}

impl Appointment {
    pub fn new(id: AppointmentId, nric: String, at: NaiveDateTime, description: String) -> Self {
        Self {
            id,
            nric,
            at,
            description,
            is_done: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prescription {
    pub patient_id: String,
    pub seq: u32,
    pub issued_at: NaiveDateTime,
    pub symptoms: Vec<String>,
    pub medicines: Vec<String>,
    pub notes: String,
}

impl Prescription {
    /// `<patientId>-<seq>`, e.g. `S1234567A-3`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.patient_id, self.seq)
    }
}

/// Splits a comma separated field, trimming entries and dropping blank ones.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Current local time truncated to the minute, which is all the prescription format keeps.
pub fn now_to_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}
