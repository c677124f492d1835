use super::{RecordKind, StorageBackend};
use crate::config::ClinicConfig;
use crate::error::{ClinicError, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Record files under a data directory, documents under an output directory.
pub struct FsBackend {
    root: PathBuf,
    document_dir: PathBuf,
    patients_file: String,
    appointments_file: String,
    prescriptions_file: String,
}

impl FsBackend {
    pub fn new(root: PathBuf, config: &ClinicConfig) -> Self {
        let document_dir = root.join(&config.document_dir);
        Self {
            root,
            document_dir,
            patients_file: config.patients_file.clone(),
            appointments_file: config.appointments_file.clone(),
            prescriptions_file: config.prescriptions_file.clone(),
        }
    }

    /// Writes documents somewhere other than `<root>/<document_dir>`.
    pub fn with_document_dir(mut self, dir: PathBuf) -> Self {
        self.document_dir = dir;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_dir(&self) -> &Path {
        &self.document_dir
    }

    pub fn record_path(&self, kind: RecordKind) -> PathBuf {
        let name = match kind {
            RecordKind::Patients => &self.patients_file,
            RecordKind::Appointments => &self.appointments_file,
            RecordKind::Prescriptions => &self.prescriptions_file,
        };
        self.root.join(name)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(ClinicError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn read_lines(&self, kind: RecordKind) -> Result<Vec<String>> {
        let path = self.record_path(kind);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(ClinicError::Io)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn append_line(&self, kind: RecordKind, line: &str) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let path = self.record_path(kind);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(ClinicError::Io)?;
        writeln!(file, "{}", line).map_err(ClinicError::Io)?;
        tracing::debug!(%kind, path = %path.display(), "appended record");
        Ok(())
    }

    fn write_lines(&self, kind: RecordKind, lines: &[String]) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let target = self.record_path(kind);

        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        // Write to a sibling then rename, so a crash never leaves half a file.
        let tmp = self.root.join(format!(".{}.tmp", kind));
        fs::write(&tmp, content).map_err(ClinicError::Io)?;
        fs::rename(&tmp, &target).map_err(ClinicError::Io)?;
        tracing::debug!(%kind, records = lines.len(), "rewrote record file");
        Ok(())
    }

    fn write_document(&self, file_name: &str, contents: &str) -> Result<PathBuf> {
        self.ensure_dir(&self.document_dir)?;
        let path = self.document_dir.join(file_name);
        fs::write(&path, contents).map_err(ClinicError::Io)?;
        Ok(path)
    }
}
