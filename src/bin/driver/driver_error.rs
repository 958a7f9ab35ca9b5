use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("file {} does not exist", .0.display())]
    InputFileDoesNotExist(PathBuf),
    #[error("C compiler exited with {0}")]
    CCompilerFailed(std::process::ExitStatus),
}
