use crate::commands::{CmdMessage, CmdResult, Listing};
use crate::error::Result;
use crate::model::{AppointmentId, APPOINTMENT_TIME_FORMAT};
use crate::parser::SortKey;
use crate::store::StorageBackend;
use crate::system::ManagementSystem;
use chrono::NaiveDateTime;

pub fn add<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    nric: String,
    at: NaiveDateTime,
    description: String,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if system.patient(&nric).is_none() {
        result.add_message(CmdMessage::warning(format!(
            "No patient registered with NRIC {}.",
            nric
        )));
    }
    let appointment = system.add_appointment(nric, at, description)?;
    result.add_message(CmdMessage::success(format!(
        "Appointment {} added for {} at {}.",
        appointment.id,
        appointment.nric,
        appointment.at.format(APPOINTMENT_TIME_FORMAT)
    )));
    result.listing = Listing::Appointments(vec![appointment]);
    Ok(result)
}

pub fn delete<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    id: AppointmentId,
) -> Result<CmdResult> {
    let message = match system.delete_appointment(id)? {
        Some(removed) => CmdMessage::success(format!("Appointment {} removed.", removed.id)),
        None => not_found(id),
    };
    Ok(CmdResult::default().with_message(message))
}

pub fn list<B: StorageBackend>(system: &ManagementSystem<B>) -> Result<CmdResult> {
    let appointments = system.appointments().to_vec();
    if appointments.is_empty() {
        return Ok(CmdResult::default().with_message(CmdMessage::info("No appointments found.")));
    }
    Ok(CmdResult::default().with_listing(Listing::Appointments(appointments)))
}

pub fn sort<B: StorageBackend>(system: &mut ManagementSystem<B>, key: SortKey) -> Result<CmdResult> {
    let sorted = system.sort_appointments(key)?.to_vec();
    let label = match key {
        SortKey::DateTime => "date and time",
        SortKey::Id => "id",
    };
    let mut result = CmdResult::default().with_message(CmdMessage::success(format!(
        "Appointments sorted by {}.",
        label
    )));
    if !sorted.is_empty() {
        result.listing = Listing::Appointments(sorted);
    }
    Ok(result)
}

/// Marks (`done = true`) or unmarks an appointment.
pub fn set_done<B: StorageBackend>(
    system: &mut ManagementSystem<B>,
    id: AppointmentId,
    done: bool,
) -> Result<CmdResult> {
    let result = match system.set_appointment_done(id, done)? {
        Some(appointment) => {
            let verb = if done { "marked as done" } else { "marked as not done" };
            CmdResult::default()
                .with_message(CmdMessage::success(format!(
                    "Appointment {} {}.",
                    appointment.id, verb
                )))
                .with_listing(Listing::Appointments(vec![appointment]))
        }
        None => CmdResult::default().with_message(not_found(id)),
    };
    Ok(result)
}

pub fn find<B: StorageBackend>(system: &ManagementSystem<B>, nric: &str) -> Result<CmdResult> {
    let found: Vec<_> = system.appointments_for(nric).into_iter().cloned().collect();
    if found.is_empty() {
        return Ok(CmdResult::default().with_message(CmdMessage::info(format!(
            "No appointments found for {}.",
            nric
        ))));
    }
    Ok(CmdResult::default().with_listing(Listing::Appointments(found)))
}

fn not_found(id: AppointmentId) -> CmdMessage {
    CmdMessage::info(format!("Appointment {} not found.", id))
}
