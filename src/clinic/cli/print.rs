use clinic::commands::{CmdMessage, CmdResult, Listing, MessageLevel};
use clinic::model::{
    Appointment, Patient, Prescription, APPOINTMENT_TIME_FORMAT, PRESCRIPTION_TIME_FORMAT,
};
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const RULE: &str = "____________________________________________________________";

/// Prints a whole command result: messages that lead into the listing first,
/// then the listing, then the rest.
pub(super) fn print_result(result: &CmdResult) {
    let split = leading_messages(result);
    print_messages(&result.messages[..split]);
    print_listing(&result.listing);
    print_messages(&result.messages[split..]);
}

/// Messages ending in ':' introduce the listing that follows them.
fn leading_messages(result: &CmdResult) -> usize {
    result
        .messages
        .iter()
        .take_while(|m| m.content.ends_with(':'))
        .count()
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_error(message: &str) {
    println!("{}", message.red());
}

pub(super) fn print_rule() {
    println!("{}", RULE.dimmed());
}

fn print_listing(listing: &Listing) {
    match listing {
        Listing::Nothing => {}
        Listing::PatientTable(patients) => print_patient_table(patients),
        Listing::PatientDetails(patients) => patients.iter().for_each(print_patient),
        Listing::Histories(patients) => patients.iter().for_each(print_history),
        Listing::Appointments(appointments) => print_appointments(appointments),
        Listing::Prescriptions(prescriptions) => {
            for (i, prescription) in prescriptions.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                print_prescription(prescription);
            }
        }
    }
}

fn print_patient_table(patients: &[Patient]) {
    let headers = ["NRIC", "Name", "DOB", "Gender", "Phone"];
    let rows: Vec<[&str; 5]> = patients
        .iter()
        .map(|p| {
            [
                p.nric.as_str(),
                p.name.as_str(),
                p.dob.as_str(),
                p.gender.as_str(),
                p.phone.as_str(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.width());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }
    // Names absorb whatever does not fit in the line.
    let others: usize = widths.iter().sum::<usize>() - widths[1] + 2 * (widths.len() - 1);
    widths[1] = widths[1].min(LINE_WIDTH.saturating_sub(others).max(8));

    println!("{}", format_row(&headers, &widths).bold());
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| pad_to_width(&truncate_to_width(cell, *width), *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn print_patient(patient: &Patient) {
    println!("{} {}", patient.name.bold(), format!("({})", patient.nric).dimmed());
    println!("  Date of birth: {}", patient.dob);
    println!("  Gender:        {}", patient.gender);
    println!("  Phone:         {}", patient.phone);
    println!("  Address:       {}", patient.address);
    if patient.history.is_empty() {
        println!("  History:       {}", "none".dimmed());
    } else {
        println!("  History:       {}", patient.history.join(", "));
    }
}

fn print_history(patient: &Patient) {
    println!("{} {}", patient.name.bold(), format!("({})", patient.nric).dimmed());
    if patient.history.is_empty() {
        println!("  {}", "No medical history recorded.".dimmed());
    }
    for entry in &patient.history {
        println!("  - {}", entry);
    }
}

fn print_appointments(appointments: &[Appointment]) {
    let id_width = appointments
        .iter()
        .map(|a| a.id.to_string().width())
        .max()
        .unwrap_or(0);
    for (i, appointment) in appointments.iter().enumerate() {
        let mark = if appointment.is_done {
            "[X]".green()
        } else {
            "[ ]".normal()
        };
        println!(
            "{:>3}. {} {} | {} | {} | {}",
            i + 1,
            mark,
            pad_to_width(&appointment.id.to_string(), id_width).yellow(),
            appointment.nric,
            appointment.at.format(APPOINTMENT_TIME_FORMAT),
            appointment.description
        );
    }
}

fn print_prescription(prescription: &Prescription) {
    println!("{} {}", "Prescription ID:".bold(), prescription.id().yellow());
    println!("Patient ID: {}", prescription.patient_id);
    println!(
        "Date: {}",
        prescription.issued_at.format(PRESCRIPTION_TIME_FORMAT)
    );
    print_list("Symptoms", &prescription.symptoms);
    print_list("Medicines", &prescription.medicines);
    if prescription.notes.is_empty() {
        println!("Notes: {}", "None".dimmed());
    } else {
        println!("Notes: {}", prescription.notes);
    }
}

fn print_list(label: &str, entries: &[String]) {
    if entries.is_empty() {
        println!("{}: {}", label, "None".dimmed());
        return;
    }
    println!("{}:", label);
    for entry in entries {
        println!("  - {}", entry);
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}
