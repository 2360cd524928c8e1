use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use tracing::{debug, warn};

use crate::core::{MysqlConnection, SetsumeiError};

pub const DEFAULT_CLIENT: &str = "mysql";
pub const DEFAULT_QUERY_FILE: &str = "setsumei-query.txt";

/// Runs the EXPLAIN batch through the `mysql` command-line client
#[derive(Debug, Clone)]
pub struct MysqlClient {
    program: String,
    connection: MysqlConnection,
    query_file: PathBuf,
}

#[derive(Debug)]
pub struct ClientResponse {
    /// Tab-separated plan text
    pub stdout: String,
    pub status: ExitStatus,
}

impl MysqlClient {
    pub fn new(connection: MysqlConnection) -> Self {
        Self {
            program: DEFAULT_CLIENT.to_string(),
            connection,
            query_file: PathBuf::from(DEFAULT_QUERY_FILE),
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_query_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.query_file = path.into();
        self
    }

    pub fn query_file(&self) -> &Path {
        &self.query_file
    }

    /// Write `query` to the query file and feed it to the client on stdin.
    /// A non-zero exit is only logged; whatever the client printed is returned.
    pub fn explain(&self, query: &str) -> Result<ClientResponse, SetsumeiError> {
        fs::write(&self.query_file, query)?;
        let input = File::open(&self.query_file)?;

        debug!(
            "{} {} < {}",
            self.program,
            self.connection.display_args(),
            self.query_file.display()
        );

        let output = Command::new(&self.program)
            .args(self.connection.client_args())
            .stdin(Stdio::from(input))
            .stderr(Stdio::inherit())
            .output()?;

        if output.status.success() {
            debug!(status = %output.status, "client finished");
        } else {
            warn!(status = %output.status, "{} process returned a failure status", self.program);
        }

        Ok(ClientResponse {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            status: output.status,
        })
    }
}
