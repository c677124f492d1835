use crate::commands::patients::not_found;
use crate::commands::{CmdMessage, CmdResult, Listing};
use crate::error::Result;
use crate::parser::HistoryQuery;
use crate::store::StorageBackend;
use crate::system::{HistoryEdit, ManagementSystem};

/// Appends entries to a patient's medical history.
///
/// The NRIC picks the patient; the name is only checked, and a mismatch is reported
/// as a warning.
pub fn store<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    name: &str,
    nric: &str,
    entries: &[String],
) -> Result<CmdResult> {
    let Some(patient) = system.store_history(nric, entries)? else {
        return Ok(not_found(nric));
    };

    let mut result = CmdResult::default();
    if !patient.name.eq_ignore_ascii_case(name.trim()) {
        result.add_message(CmdMessage::warning(format!(
            "Name \"{}\" does not match the record for {} ({}).",
            name, nric, patient.name
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Stored {} history entr{} for {} ({}).",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        patient.name,
        patient.nric
    )));
    result.listing = Listing::Histories(vec![patient]);
    Ok(result)
}

pub fn view<B: StorageBackend>(
    system: &ManagementSystem<B>,
    query: &HistoryQuery,
) -> Result<CmdResult> {
    let (matches, label) = match query {
        HistoryQuery::Nric(nric) => (
            system.patient(nric).into_iter().cloned().collect::<Vec<_>>(),
            format!("NRIC {}", nric),
        ),
        HistoryQuery::Name(name) => (
            system.patients_named(name).into_iter().cloned().collect(),
            format!("name \"{}\"", name),
        ),
    };

    if matches.is_empty() {
        return Ok(CmdResult::default().with_message(CmdMessage::info(format!(
            "No patient found with {}.",
            label
        ))));
    }
    Ok(CmdResult::default().with_listing(Listing::Histories(matches)))
}

pub fn edit<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    nric: &str,
    old: &str,
    new: &str,
) -> Result<CmdResult> {
    let result = match system.edit_history(nric, old, new)? {
        HistoryEdit::PatientNotFound => not_found(nric),
        HistoryEdit::EntryNotFound => CmdResult::default().with_message(CmdMessage::info(
            format!("No history entry \"{}\" for {}.", old, nric),
        )),
        HistoryEdit::Replaced(patient) => CmdResult::default()
            .with_message(CmdMessage::success(format!(
                "History updated for {}: \"{}\" -> \"{}\".",
                patient.nric, old, new
            )))
            .with_listing(Listing::Histories(vec![patient])),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::model::Patient;
    use crate::store::memory::MemBackend;

    fn system() -> ManagementSystem<MemBackend> {
        let mut sys = ManagementSystem::new(MemBackend::new());
        sys.add_patient(Patient::new("S1234567A", "John Doe", "1990-01-01", "M", "x", "1"))
            .unwrap();
        sys.add_patient(Patient::new("T7654321B", "john doe", "1985-05-05", "M", "y", "2"))
            .unwrap();
        sys
    }

    #[test]
    fn store_appends_and_warns_on_name_mismatch() {
        let mut sys = system();
        let result = store(&mut sys, "Someone Else", "S1234567A", &["Flu".into()]).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(result.messages[1].level, MessageLevel::Success);
        assert_eq!(sys.patient("S1234567A").unwrap().history, vec!["Flu"]);

        let quiet = store(&mut sys, "john doe", "S1234567A", &["Gout".into()]).unwrap();
        assert_eq!(quiet.messages.len(), 1);
    }

    #[test]
    fn store_for_unknown_patient_is_informational() {
        let mut sys = system();
        let result = store(&mut sys, "x", "S0000000Z", &["Flu".into()]).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn view_by_name_matches_every_patient_with_that_name() {
        let sys = system();
        let result = view(&sys, &HistoryQuery::Name("JOHN DOE".into())).unwrap();
        let Listing::Histories(found) = result.listing else {
            panic!("expected histories");
        };
        assert_eq!(found.len(), 2);

        let none = view(&sys, &HistoryQuery::Nric("S0000000Z".into())).unwrap();
        assert_eq!(none.listing, Listing::Nothing);
    }

    #[test]
    fn edit_reports_missing_entry() {
        let mut sys = system();
        store(&mut sys, "John Doe", "S1234567A", &["Flu".into()]).unwrap();
        let miss = edit(&mut sys, "S1234567A", "Measles", "Mumps").unwrap();
        assert!(miss.messages[0].content.contains("No history entry"));

        let hit = edit(&mut sys, "S1234567A", "Flu", "Influenza A").unwrap();
        assert_eq!(hit.messages[0].level, MessageLevel::Success);
        assert_eq!(sys.patient("S1234567A").unwrap().history, vec!["Influenza A"]);
    }
}
