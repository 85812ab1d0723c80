use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use url::Url;

use marcfix_core::{Field, Record, RecordId};
use marcfix_file::FileRecordClient;

/// An isolated record API and backup store in a temp directory.
pub struct Sandbox {
    dir: TempDir,
}

#[allow(dead_code)]
impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn api_dir(&self) -> PathBuf {
        self.path().join("api")
    }

    pub fn api_url(&self) -> String {
        std::fs::create_dir_all(self.api_dir()).unwrap();
        Url::from_directory_path(self.api_dir()).unwrap().to_string()
    }

    pub fn client(&self) -> FileRecordClient {
        FileRecordClient::new(self.api_dir())
    }

    /// Store a record with `dupes` identical 500 notes.
    pub fn seed(&self, id: &str, dupes: usize) -> Record {
        let record = record(id, dupes);
        self.client().insert(&record).unwrap();
        record
    }

    pub fn load(&self, id: &str) -> Record {
        let path = self
            .api_dir()
            .join("records")
            .join(format!("{}.json", RecordId::new(id).unwrap().padded()));
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Run the CLI with the sandbox API and credentials.
    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .env("MARCFIX_API_USERNAME", "cataloger")
            .env("MARCFIX_API_PASSWORD", "secret")
            .output()
            .expect("Failed to execute CLI")
    }

    /// Run the CLI and expect success; returns stdout.
    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// A CLI command with the sandbox API but no credentials.
    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_marcfix"));
        cmd.args(args)
            .current_dir(self.path())
            .env_remove("MARCFIX_API_USERNAME")
            .env_remove("MARCFIX_API_PASSWORD")
            .env("MARCFIX_API", self.api_url())
            .env("MARCFIX_BACKUP_DIR", self.path().join("backups"))
            .env("HOME", self.path())
            .env("NO_COLOR", "1");
        cmd
    }
}

pub fn record(id: &str, dupes: usize) -> Record {
    let mut record = Record::new("00000cam^a2200000^i^4500")
        .with_field(Field::control("001", RecordId::new(id).unwrap().padded()))
        .with_field(Field::data("245", "1", "0", &[("a", "A title")]));
    for _ in 0..dupes {
        record.append_field(Field::data("500", " ", " ", &[("a", "Same note")]));
    }
    record
}

/// The batch id from a `Batch: ...` output line.
#[allow(dead_code)]
pub fn batch_id(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Batch: "))
        .expect("no batch id in output")
        .trim()
        .to_string()
}
