//! Turns one REPL line into a typed [`Command`].
//!
//! The verb is the first whitespace-delimited word (case-insensitive). Field-based verbs
//! delegate to their [`Grammar`]; the rest take a single bare argument.

use crate::error::{ClinicError, Result};
use crate::grammar::{optional, required, Grammar};
use crate::model::{
    split_list, AppointmentId, Patient, PatientUpdate, APPOINTMENT_TIME_FORMAT,
};
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPatient(Patient),
    DeletePatient(String),
    ViewPatient(String),
    ListPatients,
    StoreHistory {
        name: String,
        nric: String,
        entries: Vec<String>,
    },
    ViewHistory(HistoryQuery),
    EditPatient(PatientUpdate),
    EditHistory {
        nric: String,
        old: String,
        new: String,
    },
    AddAppointment {
        nric: String,
        at: NaiveDateTime,
        description: String,
    },
    DeleteAppointment(AppointmentId),
    ListAppointments,
    SortAppointments(SortKey),
    MarkAppointment(AppointmentId),
    UnmarkAppointment(AppointmentId),
    FindAppointments(String),
    AddPrescription {
        nric: String,
        symptoms: Vec<String>,
        medicines: Vec<String>,
        notes: String,
    },
    ViewPrescription(String),
    ViewAllPrescriptions(String),
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryQuery {
    Nric(String),
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateTime,
    Id,
}

const ADD_PATIENT: Grammar = Grammar::new(
    "Patient details are incomplete! Use: add-patient n/NAME ic/NRIC dob/BIRTHDATE g/GENDER p/PHONE a/ADDRESS [h/HISTORY]",
    &[
        required("n/"),
        required("ic/"),
        required("dob/"),
        required("g/"),
        required("p/"),
        required("a/"),
        optional("h/"),
    ],
);

const STORE_HISTORY: Grammar = Grammar::new(
    "Invalid format. Use: store-history n/NAME ic/NRIC h/MEDICAL_HISTORY",
    &[required("n/"), required("ic/"), required("h/")],
);

const EDIT_PATIENT: Grammar = Grammar::new(
    "Missing NRIC! Use: edit-patient ic/NRIC [n/NAME] [dob/BIRTHDATE] [g/GENDER] [a/ADDRESS] [p/PHONE]",
    &[
        required("ic/"),
        optional("n/"),
        optional("dob/"),
        optional("g/"),
        optional("a/"),
        optional("p/"),
    ],
);

const EDIT_HISTORY: Grammar = Grammar::new(
    "Missing NRIC or history text! Use: edit-history ic/NRIC old/OLD_HISTORY new/NEW_HISTORY",
    &[required("ic/"), required("old/"), required("new/")],
);

const ADD_APPOINTMENT: Grammar = Grammar::new(
    "Missing details for add-appointment! Use: add-appointment ic/NRIC dt/DATE t/TIME dsc/DESCRIPTION",
    &[
        required("ic/"),
        required("dt/"),
        required("t/"),
        required("dsc/"),
    ],
);

const ADD_PRESCRIPTION: Grammar = Grammar::new(
    "Prescription details are incomplete! Use: add-prescription ic/NRIC s/SYMPTOMS m/MEDICINES [nt/NOTES]",
    &[
        required("ic/"),
        required("s/"),
        required("m/"),
        optional("nt/"),
    ],
);

const VIEW_HISTORY: Grammar = Grammar::new(
    "Invalid format. Use: view-history NRIC or view-history NAME",
    &[required("ic/")],
);

pub fn parse(line: &str) -> Result<Command> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "bye" => Ok(Command::Exit),
        "add-patient" => parse_add_patient(rest),
        "delete-patient" => bare(rest, "Invalid command format. Use: delete-patient NRIC")
            .map(Command::DeletePatient),
        "view-patient" => bare(rest, "Invalid command format. Use: view-patient NRIC")
            .map(Command::ViewPatient),
        "list-patient" => Ok(Command::ListPatients),
        "store-history" => {
            let mut fields = STORE_HISTORY.scan(rest)?;
            Ok(Command::StoreHistory {
                name: fields.take("n/")?,
                nric: fields.take("ic/")?,
                entries: split_list(&fields.take("h/")?),
            })
        }
        "view-history" => parse_view_history(rest),
        "edit-patient" => {
            let mut fields = EDIT_PATIENT.scan(rest)?;
            Ok(Command::EditPatient(PatientUpdate {
                nric: fields.take("ic/")?,
                name: fields.take_opt("n/"),
                dob: fields.take_opt("dob/"),
                gender: fields.take_opt("g/"),
                address: fields.take_opt("a/"),
                phone: fields.take_opt("p/"),
            }))
        }
        "edit-history" => {
            let mut fields = EDIT_HISTORY.scan(rest)?;
            Ok(Command::EditHistory {
                nric: fields.take("ic/")?,
                old: fields.take("old/")?,
                new: fields.take("new/")?,
            })
        }
        "add-appointment" => parse_add_appointment(rest),
        "delete-appointment" => appointment_id(rest, "delete-appointment")
            .map(Command::DeleteAppointment),
        "list-appointment" => Ok(Command::ListAppointments),
        "sort-appointment" => match rest.to_lowercase().as_str() {
            "bydate" => Ok(Command::SortAppointments(SortKey::DateTime)),
            "byid" => Ok(Command::SortAppointments(SortKey::Id)),
            _ => Err(ClinicError::usage(
                "Invalid format! Use: 'sort-appointment byDate' or 'sort-appointment byId'",
            )),
        },
        "mark-appointment" => {
            appointment_id(rest, "mark-appointment").map(Command::MarkAppointment)
        }
        "unmark-appointment" => {
            appointment_id(rest, "unmark-appointment").map(Command::UnmarkAppointment)
        }
        "find-appointment" => bare(rest, "Invalid format! Use: find-appointment PATIENT_NRIC")
            .map(Command::FindAppointments),
        "add-prescription" => {
            let mut fields = ADD_PRESCRIPTION.scan(rest)?;
            Ok(Command::AddPrescription {
                nric: fields.take("ic/")?,
                symptoms: split_list(&fields.take("s/")?),
                medicines: split_list(&fields.take("m/")?),
                notes: fields.take_opt("nt/").unwrap_or_default(),
            })
        }
        "view-prescription" => bare(
            rest,
            "Invalid command format. Use: view-prescription PRESCRIPTION_ID",
        )
        .map(Command::ViewPrescription),
        "view-all-prescriptions" => bare(
            rest,
            "Patient ID cannot be empty! Use: view-all-prescriptions PATIENT_NRIC",
        )
        .map(Command::ViewAllPrescriptions),
        _ => Err(ClinicError::UnknownCommand(verb.to_string())),
    }
}

fn parse_add_patient(rest: &str) -> Result<Command> {
    let mut fields = ADD_PATIENT.scan(rest)?;
    let patient = Patient::new(
        fields.take("ic/")?,
        fields.take("n/")?,
        fields.take("dob/")?,
        fields.take("g/")?,
        fields.take("a/")?,
        fields.take("p/")?,
    )
    .with_history(
        fields
            .take_opt("h/")
            .map(|h| split_list(&h))
            .unwrap_or_default(),
    );
    Ok(Command::AddPatient(patient))
}

fn parse_view_history(rest: &str) -> Result<Command> {
    if rest.is_empty() {
        return Err(ClinicError::usage(VIEW_HISTORY.usage));
    }
    if rest.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("ic/")) {
        let mut fields = VIEW_HISTORY.scan(rest)?;
        return Ok(Command::ViewHistory(HistoryQuery::Nric(fields.take("ic/")?)));
    }
    if looks_like_nric(rest) {
        Ok(Command::ViewHistory(HistoryQuery::Nric(rest.to_string())))
    } else {
        Ok(Command::ViewHistory(HistoryQuery::Name(rest.to_string())))
    }
}

fn parse_add_appointment(rest: &str) -> Result<Command> {
    let mut fields = ADD_APPOINTMENT.scan(rest)?;
    let nric = fields.take("ic/")?;
    let combined = format!("{} {}", fields.take("dt/")?, fields.take("t/")?);
    let at = NaiveDateTime::parse_from_str(&combined, APPOINTMENT_TIME_FORMAT).map_err(|_| {
        ClinicError::usage("Invalid date/time format. Please use: dt/yyyy-MM-dd and t/HHmm")
    })?;
    Ok(Command::AddAppointment {
        nric,
        at,
        description: fields.take("dsc/")?,
    })
}

/// NRIC shape: a letter, seven digits, a letter (`S1234567A`).
pub fn looks_like_nric(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 9
        && bytes[0].is_ascii_alphabetic()
        && bytes[1..8].iter().all(u8::is_ascii_digit)
        && bytes[8].is_ascii_alphabetic()
}

fn bare(rest: &str, usage: &str) -> Result<String> {
    if rest.is_empty() {
        return Err(ClinicError::usage(usage));
    }
    if rest.contains('|') {
        return Err(ClinicError::usage("Values cannot contain '|'"));
    }
    Ok(rest.to_string())
}

fn appointment_id(rest: &str, verb: &str) -> Result<AppointmentId> {
    rest.parse()
        .map_err(|_| ClinicError::usage(format!("Invalid format! Use: {} APPOINTMENT_ID", verb)))
}
