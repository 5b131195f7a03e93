use crate::deploy::ImagePusher;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error as ThisError;
use tokio::process::Command;

#[derive(ThisError, Debug)]
pub enum PushError {
    #[error("Failed to run {program}: {error}")]
    Spawn {
        program: String,
        #[source]
        error: std::io::Error,
    },
    #[error("Push exited with status {}{}", display_code(.code), display_stderr(.stderr))]
    Status { code: Option<i32>, stderr: String },
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => String::from("<signal>"),
    }
}

fn display_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Pushes images by running `docker push <image>` in a working directory.
pub struct DockerPusher {
    program: String,
    working_dir: PathBuf,
    /// Stream the output of the push instead of capturing it
    verbose: bool,
}

impl DockerPusher {
    pub fn new(working_dir: PathBuf, verbose: bool) -> Self {
        Self::with_program(String::from("docker"), working_dir, verbose)
    }

    pub fn with_program(program: String, working_dir: PathBuf, verbose: bool) -> Self {
        Self {
            program,
            working_dir,
            verbose,
        }
    }

    fn command(&self, image: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("push")
            .arg(image)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null());
        command
    }

    fn spawn_error(&self, error: std::io::Error) -> PushError {
        PushError::Spawn {
            program: self.program.clone(),
            error,
        }
    }

    async fn push_verbose(&self, image: &str) -> Result<(), PushError> {
        let status = self
            .command(image)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|error| self.spawn_error(error))?;

        if !status.success() {
            return Err(PushError::Status {
                code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(())
    }

    async fn push_quiet(&self, image: &str) -> Result<(), PushError> {
        let output = self
            .command(image)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|error| self.spawn_error(error))?;

        if !output.status.success() {
            return Err(PushError::Status {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

impl ImagePusher for DockerPusher {
    async fn push(&self, image: &str) -> Result<(), PushError> {
        tracing::debug!(program = %self.program, verbose = self.verbose, "Running push.");

        if self.verbose {
            self.push_verbose(image).await
        } else {
            self.push_quiet(image).await
        }
    }
}
