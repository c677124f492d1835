use clap::Parser;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "clinic", bin_name = "clinic", version = get_version())]
#[command(
    about = "Clinic record keeper: patients, appointments and prescriptions",
    long_about = "Reads clinic commands, one per line, from standard input until 'bye' or end of input."
)]
pub struct Cli {
    /// Directory holding the record files and config.json
    #[arg(long, env = "CLINIC_HOME", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory for generated prescription pages (default: <data dir>/prescriptions)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Verbose output (info-level logs on stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Command group definitions for the welcome screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Patients,
    History,
    Appointments,
    Prescriptions,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Patients => "Patients:",
            CommandGroup::History => "Medical History:",
            CommandGroup::Appointments => "Appointments:",
            CommandGroup::Prescriptions => "Prescriptions:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    /// Usage lines for every verb in the group
    pub fn commands(&self) -> &'static [&'static str] {
        match self {
            CommandGroup::Patients => &[
                "add-patient n/NAME ic/NRIC dob/BIRTHDATE g/GENDER p/PHONE a/ADDRESS [h/HISTORY]",
                "edit-patient ic/NRIC [n/NAME] [dob/BIRTHDATE] [g/GENDER] [a/ADDRESS] [p/PHONE]",
                "delete-patient NRIC",
                "view-patient NRIC",
                "list-patient",
            ],
            CommandGroup::History => &[
                "store-history n/NAME ic/NRIC h/HISTORY[,HISTORY...]",
                "view-history NRIC | NAME",
                "edit-history ic/NRIC old/OLD_HISTORY new/NEW_HISTORY",
            ],
            CommandGroup::Appointments => &[
                "add-appointment ic/NRIC dt/yyyy-MM-dd t/HHmm dsc/DESCRIPTION",
                "delete-appointment ID",
                "mark-appointment ID",
                "unmark-appointment ID",
                "find-appointment NRIC",
                "sort-appointment byDate | byId",
                "list-appointment",
            ],
            CommandGroup::Prescriptions => &[
                "add-prescription ic/NRIC s/SYMPTOMS m/MEDICINES [nt/NOTES]",
                "view-prescription PRESCRIPTION_ID",
                "view-all-prescriptions NRIC",
            ],
            CommandGroup::Misc => &["bye"],
        }
    }

    /// Returns all groups in display order
    pub fn all() -> &'static [CommandGroup] {
        &[
            CommandGroup::Patients,
            CommandGroup::History,
            CommandGroup::Appointments,
            CommandGroup::Prescriptions,
            CommandGroup::Misc,
        ]
    }
}

/// Welcome text listing every verb by group
pub fn get_grouped_help() -> String {
    let mut output = String::new();
    output.push_str(&format!("ClinicEase {}\n", get_version()));
    output.push_str("Enter one command per line.\n");

    for group in CommandGroup::all() {
        output.push('\n');
        output.push_str(&format!("{}\n", group.heading()));
        for usage in group.commands() {
            output.push_str(&format!("  {}\n", usage));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn grouped_help_lists_every_verb() {
        let help = get_grouped_help();
        for verb in [
            "add-patient",
            "list-patient",
            "store-history",
            "edit-history",
            "sort-appointment",
            "find-appointment",
            "view-all-prescriptions",
            "bye",
        ] {
            assert!(help.contains(verb), "missing {}", verb);
        }
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::try_parse_from(["clinic", "--data-dir", "/tmp/c", "-v"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/c")));
        assert!(cli.verbose);
        assert!(cli.output_dir.is_none());
    }
}
