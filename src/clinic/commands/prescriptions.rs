use crate::commands::{CmdMessage, CmdResult, Listing};
use crate::document;
use crate::error::Result;
use crate::model::now_to_minute;
use crate::store::StorageBackend;
use crate::system::ManagementSystem;

pub fn add<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    nric: &str,
    symptoms: Vec<String>,
    medicines: Vec<String>,
    notes: String,
) -> Result<CmdResult> {
    let Some(prescription) =
        system.add_prescription(nric, symptoms, medicines, notes, now_to_minute())?
    else {
        return Ok(patient_missing(nric));
    };

    let id = prescription.id();
    Ok(CmdResult::default()
        .with_message(CmdMessage::success("Successfully added prescription:"))
        .with_listing(Listing::Prescriptions(vec![prescription]))
        .with_message(CmdMessage::info(format!(
            "Use 'view-prescription {}' to generate a printable copy.",
            id
        ))))
}

/// Shows one prescription and writes its printable page.
///
/// When the owning patient is no longer registered the prescription is still shown,
/// but no page is written.
pub fn view<B: StorageBackend>(system: &ManagementSystem<B>, id: &str) -> Result<CmdResult> {
    let Some(prescription) = system.prescription(id) else {
        return Ok(CmdResult::default().with_message(CmdMessage::info(format!(
            "Prescription with ID {} not found.",
            id
        ))));
    };

    let mut result =
        CmdResult::default().with_listing(Listing::Prescriptions(vec![prescription.clone()]));

    let Some(patient) = system.patient(&prescription.patient_id) else {
        result.add_message(CmdMessage::warning(format!(
            "Patient with ID {} not found. No printable copy was generated.",
            prescription.patient_id
        )));
        return Ok(result);
    };

    let html = document::render_prescription(prescription, patient)?;
    let path = system
        .backend()
        .write_document(&document::file_name(prescription), &html)?;
    tracing::info!(prescription = %id, path = %path.display(), "wrote prescription page");

    result.add_message(CmdMessage::success(format!(
        "Prescription HTML file generated at: {}",
        path.display()
    )));
    result.add_message(CmdMessage::info(
        "Open this file in a web browser to view and print the prescription.",
    ));
    Ok(result.with_document(path))
}

pub fn view_all<B: StorageBackend>(system: &ManagementSystem<B>, nric: &str) -> Result<CmdResult> {
    let found: Vec<_> = system.prescriptions_for(nric).into_iter().cloned().collect();
    let owner = system
        .patient(nric)
        .map(|p| format!("{} ({})", p.name, p.nric))
        .unwrap_or_else(|| nric.to_string());

    if found.is_empty() {
        if system.patient(nric).is_none() {
            return Ok(patient_missing(nric));
        }
        return Ok(CmdResult::default().with_message(CmdMessage::info(format!(
            "No prescriptions found for patient {}.",
            owner
        ))));
    }

    let total = found.len();
    Ok(CmdResult::default()
        .with_message(CmdMessage::info(format!("Prescriptions for patient {}:", owner)))
        .with_listing(Listing::Prescriptions(found))
        .with_message(CmdMessage::info(format!("Total prescriptions: {}", total))))
}

fn patient_missing(nric: &str) -> CmdResult {
    CmdResult::default().with_message(CmdMessage::info(format!(
        "Patient with ID {} not found.",
        nric
    )))
}
