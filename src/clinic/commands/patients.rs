use crate::commands::{CmdMessage, CmdResult, Listing};
use crate::error::Result;
use crate::model::{Patient, PatientUpdate};
use crate::store::StorageBackend;
use crate::system::ManagementSystem;

pub fn add<B: StorageBackend>(system: &mut ManagementSystem<B>, patient: Patient) -> Result<CmdResult> {
    let added = system.add_patient(patient)?;
    let message = CmdMessage::success(format!("Patient added: {} ({})", added.name, added.nric));
    Ok(CmdResult::default()
        .with_listing(Listing::PatientDetails(vec![added.clone()]))
        .with_message(message))
}

pub fn delete<B: StorageBackend>(system: &mut ManagementSystem<B>, nric: &str) -> Result<CmdResult> {
    let result = match system.delete_patient(nric)? {
        Some(patient) => CmdResult::default().with_message(CmdMessage::success(format!(
            "Patient removed: {} ({})",
            patient.name, patient.nric
        ))),
        None => not_found(nric),
    };
    Ok(result)
}

pub fn view<B: StorageBackend>(system: &ManagementSystem<B>, nric: &str) -> Result<CmdResult> {
    let result = match system.patient(nric) {
        Some(patient) => {
            CmdResult::default().with_listing(Listing::PatientDetails(vec![patient.clone()]))
        }
        None => not_found(nric),
    };
    Ok(result)
}

pub fn list<B: StorageBackend>(system: &ManagementSystem<B>) -> Result<CmdResult> {
    let patients = system.patients().to_vec();
    let mut result = CmdResult::default();
    if patients.is_empty() {
        result.add_message(CmdMessage::info("No patients found."));
    } else {
        result.add_message(CmdMessage::info(format!("{} patient(s)", patients.len())));
        result.listing = Listing::PatientTable(patients);
    }
    Ok(result)
}

pub fn edit<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    update: &PatientUpdate,
) -> Result<CmdResult> {
    if update.is_empty() {
        return Ok(CmdResult::default().with_message(CmdMessage::warning(format!(
            "Nothing to update for {}.",
            update.nric
        ))));
    }

    let result = match system.edit_patient(update)? {
        Some(patient) => CmdResult::default()
            .with_listing(Listing::PatientDetails(vec![patient.clone()]))
            .with_message(CmdMessage::success(format!(
                "Patient updated: {} ({})",
                patient.name, patient.nric
            ))),
        None => not_found(&update.nric),
    };
    Ok(result)
}

pub(super) fn not_found(nric: &str) -> CmdResult {
    CmdResult::default().with_message(CmdMessage::info(format!(
        "Patient with NRIC {} not found.",
        nric
    )))
}
