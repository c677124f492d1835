//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every clinic
//! operation, whatever drives it. It opens the record store and dispatches each parsed
//! [`Command`] to its command function.
//!
//! It does no printing and holds no business logic. `ClinicApi<B: StorageBackend>` runs
//! on the filesystem store in production and on `MemBackend` in tests.

use crate::commands::{self, CmdMessage, CmdResult};
use crate::error::Result;
use crate::parser::{self, Command};
use crate::store::{self, StorageBackend};
use crate::system::ManagementSystem;

pub struct ClinicApi<B: StorageBackend> {
    system: ManagementSystem<B>,
}

impl<B: StorageBackend> ClinicApi<B> {
    /// Loads every record file from `backend`.
    ///
    /// A backend that cannot be read gives an empty store, reported in the returned
    /// messages rather than as an error, so the session can still start.
    pub fn open(backend: B) -> (Self, CmdResult) {
        let mut report = CmdResult::default();
        let system = match store::load_all(&backend) {
            Ok(loaded) => {
                let skipped = loaded.skipped();
                tracing::info!(
                    patients = loaded.patients.records.len(),
                    appointments = loaded.appointments.records.len(),
                    prescriptions = loaded.prescriptions.records.len(),
                    skipped,
                    "records loaded"
                );
                if skipped > 0 {
                    report.add_message(CmdMessage::warning(format!(
                        "Skipped {} unreadable line(s) while loading records.",
                        skipped
                    )));
                }
                ManagementSystem::from_loaded(backend, loaded)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load records, starting empty");
                report.add_message(CmdMessage::error(format!(
                    "Could not load saved records: {}",
                    err
                )));
                ManagementSystem::new(backend)
            }
        };
        (Self { system }, report)
    }

    pub fn system(&self) -> &ManagementSystem<B> {
        &self.system
    }

    /// Parses and runs one input line.
    pub fn run_line(&mut self, line: &str) -> Result<CmdResult> {
        let command = parser::parse(line)?;
        self.execute(command)
    }

    pub fn execute(&mut self, command: Command) -> Result<CmdResult> {
        let system = &mut self.system;
        match command {
            Command::AddPatient(patient) => commands::patients::add(system, patient),
            Command::DeletePatient(nric) => commands::patients::delete(system, &nric),
            Command::ViewPatient(nric) => commands::patients::view(system, &nric),
            Command::ListPatients => commands::patients::list(system),
            Command::EditPatient(update) => commands::patients::edit(system, &update),
            Command::StoreHistory {
                name,
                nric,
                entries,
            } => commands::history::store(system, &name, &nric, &entries),
            Command::ViewHistory(query) => commands::history::view(system, &query),
            Command::EditHistory { nric, old, new } => {
                commands::history::edit(system, &nric, &old, &new)
            }
            Command::AddAppointment {
                nric,
                at,
                description,
            } => commands::appointments::add(system, nric, at, description),
            Command::DeleteAppointment(id) => commands::appointments::delete(system, id),
            Command::ListAppointments => commands::appointments::list(system),
            Command::SortAppointments(key) => commands::appointments::sort(system, key),
            Command::MarkAppointment(id) => commands::appointments::set_done(system, id, true),
            Command::UnmarkAppointment(id) => commands::appointments::set_done(system, id, false),
            Command::FindAppointments(nric) => commands::appointments::find(system, &nric),
            Command::AddPrescription {
                nric,
                symptoms,
                medicines,
                notes,
            } => commands::prescriptions::add(system, &nric, symptoms, medicines, notes),
            Command::ViewPrescription(id) => commands::prescriptions::view(system, &id),
            Command::ViewAllPrescriptions(nric) => {
                commands::prescriptions::view_all(system, &nric)
            }
            Command::Exit => Ok(CmdResult::exit()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Listing, MessageLevel};
    use crate::error::ClinicError;
    use crate::store::memory::MemBackend;
    use crate::store::RecordKind;

    fn api() -> ClinicApi<MemBackend> {
        ClinicApi::open(MemBackend::new()).0
    }

    #[test]
    fn open_empty_backend_reports_nothing() {
        let (api, report) = ClinicApi::open(MemBackend::new());
        assert!(report.messages.is_empty());
        assert!(api.system().patients().is_empty());
    }

    #[test]
    fn unreadable_backend_opens_empty_with_error() {
        let backend = MemBackend::new();
        backend.seed(RecordKind::Patients, &["S1234567A|John Doe|1990-01-01|M|x|1|"]);
        backend.set_simulate_read_error(true);

        let (api, report) = ClinicApi::open(backend);
        assert_eq!(report.messages[0].level, MessageLevel::Error);
        assert!(api.system().patients().is_empty());
    }

    #[test]
    fn open_reports_skipped_lines_and_continues_counters() {
        let backend = MemBackend::new();
        backend.seed(
            RecordKind::Patients,
            &["S1234567A|John Doe|1990-01-01|M|123 Main St|81234567|", "garbage"],
        );
        backend.seed(
            RecordKind::Prescriptions,
            &["S1234567A|4|2025-03-01 10:00|Fever|Rest|"],
        );

        let (mut api, report) = ClinicApi::open(backend);
        assert_eq!(report.messages[0].level, MessageLevel::Warning);
        assert!(report.messages[0].content.contains("Skipped 1"));

        api.run_line("add-prescription ic/S1234567A s/Cough m/Syrup")
            .unwrap();
        assert!(api.system().prescription("S1234567A-5").is_some());
    }

    #[test]
    fn scenario_add_patient_then_prescription() {
        let mut api = api();
        api.run_line(
            "add-patient n/John Doe ic/S1234567A dob/1990-01-01 g/M p/81234567 a/123 Main St",
        )
        .unwrap();
        api.run_line("add-prescription ic/S1234567A s/Fever,Cough m/Paracetamol nt/rest")
            .unwrap();

        let all = api.system().prescriptions();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id(), "S1234567A-1");
        assert_eq!(all[0].symptoms, vec!["Fever", "Cough"]);
        assert_eq!(all[0].medicines, vec!["Paracetamol"]);
        assert_eq!(all[0].notes, "rest");
    }

    #[test]
    fn bye_requests_exit() {
        let mut api = api();
        assert!(api.run_line("bye").unwrap().exit);
        assert!(!api.run_line("list-patient").unwrap().exit);
    }

    #[test]
    fn parse_errors_surface_as_errors() {
        let mut api = api();
        assert!(matches!(
            api.run_line("frobnicate"),
            Err(ClinicError::UnknownCommand(_))
        ));
        assert!(matches!(
            api.run_line("add-patient n/John"),
            Err(ClinicError::InvalidInput(_))
        ));
    }

    #[test]
    fn appointment_verbs_dispatch() {
        let mut api = api();
        api.run_line("add-appointment ic/S1234567A dt/2025-03-02 t/0900 dsc/Checkup")
            .unwrap();
        api.run_line("mark-appointment A1").unwrap();
        assert!(api.system().appointments()[0].is_done);

        let found = api.run_line("find-appointment S1234567A").unwrap();
        assert!(matches!(found.listing, Listing::Appointments(ref a) if a.len() == 1));

        api.run_line("delete-appointment a1").unwrap();
        assert!(api.system().appointments().is_empty());
    }

    #[test]
    fn storage_failure_is_an_error_for_the_command() {
        let mut api = api();
        api.system().backend().set_simulate_write_error(true);
        let result = api.run_line(
            "add-patient n/John Doe ic/S1234567A dob/1990-01-01 g/M p/81234567 a/123 Main St",
        );
        assert!(matches!(result, Err(ClinicError::Store(_))));
        assert!(api.system().patients().is_empty());
    }
}
