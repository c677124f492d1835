//! Printable prescription pages.
//!
//! The page layout lives in `templates/prescription.html` and is compiled into the
//! binary. The template name ends in `.html`, which turns on minijinja's HTML
//! auto-escaping for every interpolated value.

use crate::error::Result;
use crate::model::{Patient, Prescription, PRESCRIPTION_TIME_FORMAT};
use minijinja::{context, Environment};

const PRESCRIPTION_TEMPLATE: &str = include_str!("templates/prescription.html");
const PRESCRIPTION_TEMPLATE_NAME: &str = "prescription.html";

/// File name the page for `prescription` is written under.
pub fn file_name(prescription: &Prescription) -> String {
    format!("prescription_{}.html", prescription.id())
}

pub fn render_prescription(prescription: &Prescription, patient: &Patient) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(PRESCRIPTION_TEMPLATE_NAME, PRESCRIPTION_TEMPLATE)?;
    let template = env.get_template(PRESCRIPTION_TEMPLATE_NAME)?;

    let html = template.render(context! {
        id => prescription.id(),
        issued_at => prescription.issued_at.format(PRESCRIPTION_TIME_FORMAT).to_string(),
        patient => patient,
        symptoms => &prescription.symptoms,
        medicines => &prescription.medicines,
        notes => &prescription.notes,
    })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn prescription(notes: &str) -> Prescription {
        Prescription {
            patient_id: "S1234567A".to_string(),
            seq: 1,
            issued_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(14, 5, 0)
                .unwrap(),
            symptoms: vec!["Fever".to_string(), "Cough".to_string()],
            medicines: vec!["Paracetamol".to_string()],
            notes: notes.to_string(),
        }
    }

    fn patient() -> Patient {
        Patient::new("S1234567A", "John Doe", "1990-01-01", "M", "123 Main St", "81234567")
    }

    #[test]
    fn file_name_uses_prescription_id() {
        assert_eq!(file_name(&prescription("")), "prescription_S1234567A-1.html");
    }

    #[test]
    fn renders_patient_and_lists() {
        let html = render_prescription(&prescription("rest"), &patient()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Prescription ID: S1234567A-1"));
        assert!(html.contains("Date: 2025-03-01 14:05"));
        assert!(html.contains("<strong>Name:</strong> John Doe"));
        assert!(html.contains("<li>Fever</li>"));
        assert!(html.contains("<li>Cough</li>"));
        assert!(html.contains("<li>Paracetamol</li>"));
        assert!(html.contains("Additional Notes"));
        assert!(html.contains("valid for 30 days"));
        assert!(html.contains("window.print()"));
        assert!(html.contains("@media print"));
    }

    #[test]
    fn notes_section_is_omitted_when_empty() {
        let html = render_prescription(&prescription(""), &patient()).unwrap();
        assert!(!html.contains("Additional Notes"));
    }

    #[test]
    fn values_are_escaped() {
        let mut rx = prescription("<script>alert(1)</script>");
        rx.symptoms = vec!["a & b".to_string()];
        let html = render_prescription(&rx, &patient()).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}
