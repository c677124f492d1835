//! # Record Store
//!
//! [`ManagementSystem`] owns every record for the lifetime of the process: the three
//! ordered collections and both identifier counters. All lookups are linear scans.
//!
//! Mutations persist through the [`StorageBackend`] before returning: creations append
//! one line, everything else rewrites the affected file.
//!
//! "Not found" is never an error here. Lookups and removals return `Option`, and the
//! command layer turns `None` into an informational message.

use crate::error::{ClinicError, Result};
use crate::model::{Appointment, AppointmentId, Patient, PatientUpdate, Prescription};
use crate::parser::SortKey;
use crate::store::codec;
use crate::store::{LoadReport, RecordKind, StorageBackend};
use chrono::NaiveDateTime;

/// Outcome of replacing one medical-history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEdit {
    PatientNotFound,
    EntryNotFound,
    Replaced(Patient),
}

pub struct ManagementSystem<B: StorageBackend> {
    backend: B,
    patients: Vec<Patient>,
    appointments: Vec<Appointment>,
    prescriptions: Vec<Prescription>,
    next_appointment: u32,
    next_prescription: u32,
}

impl<B: StorageBackend> ManagementSystem<B> {
    /// An empty store. Nothing is read from the backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            patients: Vec::new(),
            appointments: Vec::new(),
            prescriptions: Vec::new(),
            next_appointment: 1,
            next_prescription: 1,
        }
    }

    /// A store seeded from a [`LoadReport`]. Counters continue after the highest
    /// identifier seen, so ids are never reused across sessions.
    pub fn from_loaded(backend: B, report: LoadReport) -> Self {
        let max_appointment = report
            .appointments
            .records
            .iter()
            .map(|a| a.id.seq())
            .chain(report.appointment_counter)
            .max()
            .unwrap_or(0);
        let max_prescription = report
            .prescriptions
            .records
            .iter()
            .map(|p| p.seq)
            .max()
            .unwrap_or(0);

        Self {
            backend,
            patients: report.patients.records,
            appointments: report.appointments.records,
            prescriptions: report.prescriptions.records,
            next_appointment: max_appointment.checked_add(1).unwrap_or(u32::MAX),
            next_prescription: max_prescription.checked_add(1).unwrap_or(u32::MAX),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // --- Patients ---

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn patient(&self, nric: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.nric == nric)
    }

    pub fn patients_named(&self, name: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .collect()
    }

    /// Fails with [`ClinicError::DuplicatePatient`] if the NRIC is taken; the store is
    /// left untouched in that case.
    pub fn add_patient(&mut self, patient: Patient) -> Result<&Patient> {
        if self.patient(&patient.nric).is_some() {
            return Err(ClinicError::DuplicatePatient(patient.nric));
        }
        self.backend
            .append_line(RecordKind::Patients, &codec::encode_patient(&patient))?;
        self.patients.push(patient);
        Ok(&self.patients[self.patients.len() - 1])
    }

    pub fn delete_patient(&mut self, nric: &str) -> Result<Option<Patient>> {
        let Some(pos) = self.patients.iter().position(|p| p.nric == nric) else {
            return Ok(None);
        };
        let removed = self.patients.remove(pos);
        self.save_patients()?;
        Ok(Some(removed))
    }

    pub fn edit_patient(&mut self, update: &PatientUpdate) -> Result<Option<Patient>> {
        let Some(patient) = self.patients.iter_mut().find(|p| p.nric == update.nric) else {
            return Ok(None);
        };
        patient.apply(update);
        let updated = patient.clone();
        self.save_patients()?;
        Ok(Some(updated))
    }

    pub fn store_history(&mut self, nric: &str, entries: &[String]) -> Result<Option<Patient>> {
        let Some(patient) = self.patients.iter_mut().find(|p| p.nric == nric) else {
            return Ok(None);
        };
        patient.history.extend(entries.iter().cloned());
        let updated = patient.clone();
        self.save_patients()?;
        Ok(Some(updated))
    }

    /// Replaces the first history entry matching `old` (ignoring ASCII case) with `new`.
    ///
    /// `new` must be a single entry: history is stored comma separated, so a comma
    /// would come back as several entries after a reload.
    pub fn edit_history(&mut self, nric: &str, old: &str, new: &str) -> Result<HistoryEdit> {
        let new = new.trim();
        if new.is_empty() || new.contains(',') {
            return Err(ClinicError::usage(
                "The new history entry must be a single non-empty entry without commas.",
            ));
        }
        let Some(patient) = self.patients.iter_mut().find(|p| p.nric == nric) else {
            return Ok(HistoryEdit::PatientNotFound);
        };
        let Some(entry) = patient
            .history
            .iter_mut()
            .find(|entry| entry.eq_ignore_ascii_case(old.trim()))
        else {
            return Ok(HistoryEdit::EntryNotFound);
        };
        *entry = new.to_string();
        let updated = patient.clone();
        self.save_patients()?;
        Ok(HistoryEdit::Replaced(updated))
    }

    fn save_patients(&self) -> Result<()> {
        let lines: Vec<String> = self.patients.iter().map(codec::encode_patient).collect();
        self.backend.write_lines(RecordKind::Patients, &lines)
    }

    // --- Appointments ---

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Appointments for one patient, in stored order. The NRIC need not belong to a
    /// registered patient.
    pub fn appointments_for(&self, nric: &str) -> Vec<&Appointment> {
        self.appointments.iter().filter(|a| a.nric == nric).collect()
    }

    pub fn add_appointment(
        &mut self,
        nric: String,
        at: NaiveDateTime,
        description: String,
    ) -> Result<Appointment> {
        let following = next_sequence(self.next_appointment, "appointment")?;
        let appointment = Appointment::new(
            AppointmentId::new(self.next_appointment),
            nric,
            at,
            description,
        );
        self.backend.append_line(
            RecordKind::Appointments,
            &codec::encode_appointment(&appointment),
        )?;
        self.next_appointment = following;
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    pub fn delete_appointment(&mut self, id: AppointmentId) -> Result<Option<Appointment>> {
        let Some(pos) = self.appointments.iter().position(|a| a.id == id) else {
            return Ok(None);
        };
        let removed = self.appointments.remove(pos);
        self.save_appointments()?;
        Ok(Some(removed))
    }

    /// Sets the done flag. `None` when no appointment has that id.
    pub fn set_appointment_done(
        &mut self,
        id: AppointmentId,
        done: bool,
    ) -> Result<Option<Appointment>> {
        let Some(appointment) = self.appointments.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        appointment.is_done = done;
        let updated = appointment.clone();
        self.save_appointments()?;
        Ok(Some(updated))
    }

    /// Reorders the stored appointments. The sort is stable.
    pub fn sort_appointments(&mut self, key: SortKey) -> Result<&[Appointment]> {
        match key {
            SortKey::DateTime => self.appointments.sort_by_key(|a| a.at),
            SortKey::Id => self.appointments.sort_by_key(|a| a.id),
        }
        self.save_appointments()?;
        Ok(&self.appointments)
    }

    fn save_appointments(&self) -> Result<()> {
        let lines: Vec<String> = self
            .appointments
            .iter()
            .map(codec::encode_appointment)
            .collect();
        self.backend.write_lines(RecordKind::Appointments, &lines)
    }

    // --- Prescriptions ---

    pub fn prescriptions(&self) -> &[Prescription] {
        &self.prescriptions
    }

    pub fn prescription(&self, id: &str) -> Option<&Prescription> {
        self.prescriptions.iter().find(|p| p.id() == id)
    }

    pub fn prescriptions_for(&self, nric: &str) -> Vec<&Prescription> {
        self.prescriptions
            .iter()
            .filter(|p| p.patient_id == nric)
            .collect()
    }

    /// Creates a prescription for a registered patient.
    ///
    /// Returns `Ok(None)` without creating anything when the patient is unknown.
    pub fn add_prescription(
        &mut self,
        nric: &str,
        symptoms: Vec<String>,
        medicines: Vec<String>,
        notes: String,
        issued_at: NaiveDateTime,
    ) -> Result<Option<Prescription>> {
        if self.patient(nric).is_none() {
            return Ok(None);
        }
        let following = next_sequence(self.next_prescription, "prescription")?;
        let prescription = Prescription {
            patient_id: nric.to_string(),
            seq: self.next_prescription,
            issued_at,
            symptoms,
            medicines,
            notes,
        };
        self.backend.append_line(
            RecordKind::Prescriptions,
            &codec::encode_prescription(&prescription),
        )?;
        self.next_prescription = following;
        self.prescriptions.push(prescription.clone());
        Ok(Some(prescription))
    }
}

/// The counter value after `current` is issued. `u32::MAX` is never issued.
fn next_sequence(current: u32, what: &str) -> Result<u32> {
    current
        .checked_add(1)
        .ok_or_else(|| ClinicError::Store(format!("no {} ids left to issue", what)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::load_all;
    use crate::store::memory::MemBackend;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn john() -> Patient {
        Patient::new("S1234567A", "John Doe", "1990-01-01", "M", "123 Main St", "81234567")
    }

    fn system() -> ManagementSystem<MemBackend> {
        ManagementSystem::new(MemBackend::new())
    }

    #[test]
    fn add_patient_appends_one_line() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();

        assert_eq!(sys.patients().len(), 1);
        assert_eq!(
            sys.backend().lines(RecordKind::Patients),
            vec!["S1234567A|John Doe|1990-01-01|M|123 Main St|81234567|"]
        );
        assert_eq!(sys.backend().append_count(), 1);
        assert_eq!(sys.backend().rewrite_count(), 0);
    }

    #[test]
    fn duplicate_patient_is_rejected_without_mutation() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();

        let dup = Patient::new("S1234567A", "Jane Smith", "1992-02-02", "F", "456 Rd", "9000");
        let err = sys.add_patient(dup).unwrap_err();

        assert!(matches!(err, ClinicError::DuplicatePatient(id) if id == "S1234567A"));
        assert_eq!(sys.patients().len(), 1);
        assert_eq!(sys.patients()[0].name, "John Doe");
        assert_eq!(sys.backend().lines(RecordKind::Patients).len(), 1);
    }

    #[test]
    fn patient_ids_are_case_sensitive() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();
        let lower = Patient::new("s1234567a", "John Doe", "1990-01-01", "M", "x", "1");
        assert!(sys.add_patient(lower).is_ok());
        assert!(sys.patient("s1234567a").is_some());
    }

    #[test]
    fn delete_missing_patient_is_none() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();

        assert_eq!(sys.delete_patient("S9999999X").unwrap(), None);
        assert_eq!(sys.patients().len(), 1);

        let removed = sys.delete_patient("S1234567A").unwrap().unwrap();
        assert_eq!(removed.name, "John Doe");
        assert!(sys.patients().is_empty());
        assert!(sys.backend().lines(RecordKind::Patients).is_empty());
    }

    #[test]
    fn edit_patient_rewrites_file() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();
        let update = PatientUpdate {
            nric: "S1234567A".into(),
            address: Some("9 New Ave".into()),
            ..Default::default()
        };
        let updated = sys.edit_patient(&update).unwrap().unwrap();
        assert_eq!(updated.address, "9 New Ave");
        assert_eq!(sys.backend().rewrite_count(), 1);
        assert!(sys.backend().lines(RecordKind::Patients)[0].contains("9 New Ave"));

        let missing = PatientUpdate {
            nric: "nope".into(),
            ..Default::default()
        };
        assert_eq!(sys.edit_patient(&missing).unwrap(), None);
    }

    #[test]
    fn history_store_and_edit() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();

        sys.store_history("S1234567A", &["Flu".into(), "Asthma".into()])
            .unwrap()
            .unwrap();
        assert_eq!(sys.patient("S1234567A").unwrap().history, vec!["Flu", "Asthma"]);

        let edit = sys.edit_history("S1234567A", "flu", "Covid-19").unwrap();
        let HistoryEdit::Replaced(patient) = edit else {
            panic!("expected Replaced");
        };
        assert_eq!(patient.history, vec!["Covid-19", "Asthma"]);
        assert_eq!(
            sys.edit_history("S1234567A", "Measles", "x").unwrap(),
            HistoryEdit::EntryNotFound
        );
        assert_eq!(
            sys.edit_history("nope", "Flu", "x").unwrap(),
            HistoryEdit::PatientNotFound
        );
        assert_eq!(sys.store_history("nope", &["x".into()]).unwrap(), None);
    }

    #[test]
    fn appointment_ids_increase() {
        let mut sys = system();
        let a = sys
            .add_appointment("S1".into(), at(2025, 3, 20, 19, 0), "Checkup".into())
            .unwrap();
        let b = sys
            .add_appointment("S2".into(), at(2025, 3, 21, 9, 0), "Scan".into())
            .unwrap();
        assert_eq!(a.id.to_string(), "A1");
        assert_eq!(b.id.to_string(), "A2");

        sys.delete_appointment(b.id).unwrap().unwrap();
        let c = sys
            .add_appointment("S3".into(), at(2025, 3, 22, 9, 0), "X".into())
            .unwrap();
        assert_eq!(c.id.to_string(), "A3");
    }

    #[test]
    fn delete_missing_appointment_is_none() {
        let mut sys = system();
        sys.add_appointment("S1".into(), at(2025, 3, 25, 21, 0), "Checkup".into())
            .unwrap();
        assert_eq!(sys.delete_appointment(AppointmentId::new(999)).unwrap(), None);
        assert_eq!(sys.appointments().len(), 1);
    }

    #[test]
    fn sort_by_date_then_id_restores_insertion_order() {
        let mut sys = system();
        sys.add_appointment("S1".into(), at(2025, 3, 25, 19, 0), "Checkup".into())
            .unwrap();
        sys.add_appointment("S2".into(), at(2025, 3, 24, 12, 0), "CT scan".into())
            .unwrap();
        sys.add_appointment("S3".into(), at(2025, 3, 25, 10, 0), "Consultation".into())
            .unwrap();

        let by_date: Vec<_> = sys
            .sort_appointments(SortKey::DateTime)
            .unwrap()
            .iter()
            .map(|a| a.description.clone())
            .collect();
        assert_eq!(by_date, vec!["CT scan", "Consultation", "Checkup"]);

        let by_id: Vec<_> = sys
            .sort_appointments(SortKey::Id)
            .unwrap()
            .iter()
            .map(|a| a.description.clone())
            .collect();
        assert_eq!(by_id, vec!["Checkup", "CT scan", "Consultation"]);
    }

    #[test]
    fn sort_by_id_is_numeric() {
        let backend = MemBackend::new();
        backend.seed(
            RecordKind::Appointments,
            &[
                "10|false|S1|2025-03-20 1900|ten",
                "2|false|S1|2025-03-20 1900|two",
            ],
        );
        let report = load_all(&backend).unwrap();
        let mut sys = ManagementSystem::from_loaded(backend, report);
        let order: Vec<_> = sys
            .sort_appointments(SortKey::Id)
            .unwrap()
            .iter()
            .map(|a| a.id.to_string())
            .collect();
        assert_eq!(order, vec!["A2", "A10"]);
    }

    #[test]
    fn mark_and_unmark() {
        let mut sys = system();
        let a = sys
            .add_appointment("S1".into(), at(2025, 4, 10, 15, 0), "Dental".into())
            .unwrap();
        assert!(sys.set_appointment_done(a.id, true).unwrap().unwrap().is_done);
        assert!(sys.appointments()[0].is_done);
        assert!(!sys.set_appointment_done(a.id, false).unwrap().unwrap().is_done);
        assert_eq!(
            sys.set_appointment_done(AppointmentId::new(42), true).unwrap(),
            None
        );
    }

    #[test]
    fn find_appointments_by_nric() {
        let mut sys = system();
        sys.add_appointment("S1".into(), at(2025, 6, 20, 9, 0), "A".into())
            .unwrap();
        sys.add_appointment("S2".into(), at(2025, 6, 21, 9, 0), "B".into())
            .unwrap();
        sys.add_appointment("S1".into(), at(2025, 6, 22, 9, 0), "C".into())
            .unwrap();
        let found: Vec<_> = sys
            .appointments_for("S1")
            .iter()
            .map(|a| a.description.as_str())
            .collect();
        assert_eq!(found, vec!["A", "C"]);
        assert!(sys.appointments_for("A999").is_empty());
    }

    #[test]
    fn prescription_ids_strictly_increase() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();
        let now = at(2025, 4, 1, 9, 30);

        let mut last = 0;
        for _ in 0..3 {
            let p = sys
                .add_prescription("S1234567A", vec!["Fever".into()], vec![], String::new(), now)
                .unwrap()
                .unwrap();
            let id = p.id();
            let (patient, seq) = id.rsplit_once('-').unwrap();
            let seq: u32 = seq.parse().unwrap();
            assert_eq!(patient, "S1234567A");
            assert!(seq > last);
            last = seq;
        }
        assert_eq!(sys.prescriptions_for("S1234567A").len(), 3);
    }

    #[test]
    fn prescription_for_unknown_patient_is_skipped() {
        let mut sys = system();
        let issued = at(2025, 1, 1, 0, 0);
        let result = sys
            .add_prescription("S0000000Z", vec!["Fever".into()], vec![], String::new(), issued)
            .unwrap();
        assert_eq!(result, None);
        assert!(sys.prescriptions().is_empty());
        assert!(sys.backend().lines(RecordKind::Prescriptions).is_empty());
    }

    #[test]
    fn counters_continue_after_reload() {
        let backend = MemBackend::new();
        backend.seed(RecordKind::Patients, &["S1|Ann|2000-01-01|F|Addr|9000|"]);
        backend.seed(
            RecordKind::Appointments,
            &["countId:7", "4|false|S1|2025-03-20 1900|Checkup"],
        );
        backend.seed(
            RecordKind::Prescriptions,
            &["S1|5|2025-04-01 09:30|Fever|Rest|"],
        );
        let report = load_all(&backend).unwrap();
        let mut sys = ManagementSystem::from_loaded(backend, report);

        let appt = sys
            .add_appointment("S1".into(), at(2025, 5, 1, 9, 0), "Follow-up".into())
            .unwrap();
        assert_eq!(appt.id, AppointmentId::new(8));

        let issued = at(2025, 5, 1, 9, 0);
        let p = sys
            .add_prescription("S1", vec!["Cough".into()], vec![], String::new(), issued)
            .unwrap()
            .unwrap();
        assert_eq!(p.id(), "S1-6");
        assert!(sys.prescription("S1-5").is_some());
    }

    #[test]
    fn edited_history_entry_survives_reload() {
        let mut sys = system();
        sys.add_patient(john()).unwrap();
        sys.store_history("S1234567A", &["Flu".into(), "Asthma".into()])
            .unwrap();

        assert!(matches!(
            sys.edit_history("S1234567A", "Flu", "Flu, mild"),
            Err(ClinicError::InvalidInput(_))
        ));
        assert_eq!(sys.patient("S1234567A").unwrap().history, vec!["Flu", "Asthma"]);

        sys.edit_history("S1234567A", "Flu", "Influenza (mild)").unwrap();
        let line = &sys.backend().lines(RecordKind::Patients)[0];
        let reloaded = codec::decode_patient(line).unwrap();
        assert_eq!(
            reloaded.history,
            sys.patient("S1234567A").unwrap().history
        );
    }

    #[test]
    fn max_sequence_lines_are_skipped_on_load() {
        let backend = MemBackend::new();
        backend.seed(RecordKind::Patients, &["S1|Ann|2000-01-01|F|Addr|9000|"]);
        backend.seed(
            RecordKind::Appointments,
            &[
                "countId:4294967295",
                "4294967295|false|S1|2025-03-20 1900|x",
                "2|false|S1|2025-03-21 1900|y",
            ],
        );
        backend.seed(
            RecordKind::Prescriptions,
            &["S1|4294967295|2025-04-01 09:30|Fever|Rest|"],
        );
        let report = load_all(&backend).unwrap();
        assert_eq!(report.skipped(), 3);

        let mut sys = ManagementSystem::from_loaded(backend, report);
        let appt = sys
            .add_appointment("S1".into(), at(2025, 5, 1, 9, 0), "Follow-up".into())
            .unwrap();
        assert_eq!(appt.id, AppointmentId::new(3));
        let issued = at(2025, 5, 1, 9, 0);
        let p = sys
            .add_prescription("S1", vec!["Cough".into()], vec![], String::new(), issued)
            .unwrap()
            .unwrap();
        assert_eq!(p.id(), "S1-1");
    }

    #[test]
    fn exhausted_counter_refuses_creation() {
        let backend = MemBackend::new();
        backend.seed(
            RecordKind::Appointments,
            &["4294967294|false|S1|2025-03-20 1900|x"],
        );
        let report = load_all(&backend).unwrap();
        let mut sys = ManagementSystem::from_loaded(backend, report);

        let result = sys.add_appointment("S1".into(), at(2025, 5, 1, 9, 0), "x".into());
        assert!(matches!(result, Err(ClinicError::Store(_))));
        assert_eq!(sys.appointments().len(), 1);
        assert_eq!(sys.backend().lines(RecordKind::Appointments).len(), 1);
    }

    #[test]
    fn failed_write_surfaces_error() {
        let mut sys = system();
        sys.backend().set_simulate_write_error(true);
        assert!(sys.add_patient(john()).is_err());
        assert!(sys.patients().is_empty());
    }
}
