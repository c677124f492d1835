//! Line formats for the three record files.
//!
//! ```text
//! patients.txt       id|name|dob|gender|address|contact|history_csv
//! appointments.txt   seq|isDone|nric|yyyy-MM-dd HHmm|description
//! prescriptions.txt  patientId|seq|yyyy-MM-dd HH:mm|symptoms_csv|medicines_csv|notes
//! ```
//!
//! The last column is split off with a bounded split, so it may itself contain `|`.
//! Decoders return `None` for lines they cannot read; the loader counts and skips them.

use crate::model::{
    split_list, Appointment, AppointmentId, Patient, Prescription, APPOINTMENT_TIME_FORMAT,
    PRESCRIPTION_TIME_FORMAT,
};
use chrono::NaiveDateTime;

const PATIENT_FIELDS: usize = 7;
const APPOINTMENT_FIELDS: usize = 5;
const PRESCRIPTION_FIELDS: usize = 6;

/// Older appointment files start with a `countId:N` counter line.
pub const LEGACY_COUNTER_PREFIX: &str = "countId:";

/// Sequence numbers are never issued at `u32::MAX`, so a line holding it is corrupt.
fn sequence(raw: &str) -> Option<u32> {
    raw.trim().parse().ok().filter(|&seq| seq != u32::MAX)
}

pub fn encode_patient(p: &Patient) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        p.nric,
        p.name,
        p.dob,
        p.gender,
        p.address,
        p.phone,
        p.history.join(",")
    )
}

pub fn decode_patient(line: &str) -> Option<Patient> {
    let cols = split_columns(line, PATIENT_FIELDS)?;
    if cols[0].trim().is_empty() {
        return None;
    }
    Some(
        Patient::new(cols[0], cols[1], cols[2], cols[3], cols[4], cols[5])
            .with_history(split_list(cols[6])),
    )
}

pub fn encode_appointment(a: &Appointment) -> String {
    format!(
        "{}|{}|{}|{}|{}",
        a.id.seq(),
        a.is_done,
        a.nric,
        a.at.format(APPOINTMENT_TIME_FORMAT),
        a.description
    )
}

pub fn decode_appointment(line: &str) -> Option<Appointment> {
    let cols = split_columns(line, APPOINTMENT_FIELDS)?;
    let seq = sequence(cols[0])?;
    let is_done = match cols[1].trim() {
        "true" => true,
        "false" => false,
        _ => return None,
    };
    let at = NaiveDateTime::parse_from_str(cols[3].trim(), APPOINTMENT_TIME_FORMAT).ok()?;
    Some(Appointment {
        id: AppointmentId::new(seq),
        nric: cols[2].trim().to_string(),
        at,
        description: cols[4].trim().to_string(),
        is_done,
    })
}

/// Reads a `countId:N` line. Anything else is `None`.
pub fn decode_legacy_counter(line: &str) -> Option<u32> {
    sequence(line.strip_prefix(LEGACY_COUNTER_PREFIX)?)
}

pub fn encode_prescription(p: &Prescription) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}",
        p.patient_id,
        p.seq,
        p.issued_at.format(PRESCRIPTION_TIME_FORMAT),
        p.symptoms.join(","),
        p.medicines.join(","),
        p.notes
    )
}

pub fn decode_prescription(line: &str) -> Option<Prescription> {
    let cols = split_columns(line, PRESCRIPTION_FIELDS)?;
    let patient_id = cols[0].trim();
    if patient_id.is_empty() {
        return None;
    }
    let seq = sequence(cols[1])?;
    if seq == 0 {
        return None;
    }
    let issued_at =
        NaiveDateTime::parse_from_str(cols[2].trim(), PRESCRIPTION_TIME_FORMAT).ok()?;
    Some(Prescription {
        patient_id: patient_id.to_string(),
        seq,
        issued_at,
        symptoms: split_list(cols[3]),
        medicines: split_list(cols[4]),
        notes: cols[5].to_string(),
    })
}

fn split_columns(line: &str, count: usize) -> Option<Vec<&str>> {
    let cols: Vec<&str> = line.splitn(count, '|').collect();
    (cols.len() == count).then_some(cols)
}
