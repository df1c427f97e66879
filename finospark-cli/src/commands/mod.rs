//! CLI command implementations

pub mod analyze;
pub mod drafts;
pub mod import;
pub mod logs;
pub mod plan;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use finospark_core::{EntryPoint, FinosparkContext, LogEvent, LoggingService};

/// Environment override for the data directory
const DATA_DIR_ENV: &str = "FINOSPARK_DIR";

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize; logging never blocks a command.
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Record that a command ran, ignoring any errors
pub fn log_command(logger: &Option<LoggingService>, command: &str) {
    if let Some(l) = logger {
        let _ = l.log_command(command);
    }
}

/// Record a failure, ignoring any errors
pub fn log_error(
    logger: &Option<LoggingService>,
    event: &str,
    message: &str,
    details: Option<&str>,
) {
    if let Some(l) = logger {
        let _ = l.log_error(event, message, details);
    }
}

/// Data directory from `FINOSPARK_DIR`, else `~/.finospark`
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".finospark"))
        .context("Could not find home directory; set FINOSPARK_DIR")
}

pub fn get_context() -> Result<FinosparkContext> {
    let data_dir = get_data_dir()?;
    FinosparkContext::new(&data_dir).context("Failed to initialize finospark context")
}

/// Read input from a file, or from stdin when it is piped
pub fn read_input(file: Option<&Path>, what: &str) -> Result<String> {
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}: {:?}", what, path));
    }
    if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .with_context(|| format!("Failed to read {} from stdin", what))?;
        return Ok(buffer);
    }
    anyhow::bail!("No {} provided. Pass a file path or pipe it on stdin.", what)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finospark_core::services::logging::events;
    use tempfile::tempdir;

    #[test]
    fn test_command_and_error_helpers_write_entries() {
        let dir = tempdir().unwrap();
        let logger = Some(LoggingService::new(dir.path(), EntryPoint::Cli, "test").unwrap());

        log_command(&logger, "import");
        log_error(&logger, events::RECEIPT_REJECTED, "Unauthorized", Some("status 401"));
        log_command(&None, "import");

        let service = logger.as_ref().unwrap();
        assert_eq!(service.count().unwrap(), 2);
        assert_eq!(service.count_errors().unwrap(), 1);

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors[0].event, events::RECEIPT_REJECTED);
        assert_eq!(errors[0].error_message.as_deref(), Some("Unauthorized"));
        assert_eq!(errors[0].error_details.as_deref(), Some("status 401"));

        let recent = service.get_recent(10).unwrap();
        assert!(recent
            .iter()
            .any(|e| e.event == events::COMMAND_EXECUTED && e.command.as_deref() == Some("import")));
    }
}
