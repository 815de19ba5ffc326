use phub_domain::config::LoggingConfig;
use phub_logger::Logger;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn configured_directory_gets_text_log_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("nested").join("logs");
    let config = LoggingConfig { level: "info".to_owned(), directory: Some(log_dir.clone()), json: false };

    let logger = Logger::from_config("phub-file-logging", &config)?;
    assert!(logger.writes_files());

    tracing::info!(postal_code = "110001", "Location catalog loaded");
    tracing::debug!("filtered out at info");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");
    let name = log_file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    assert!(name.starts_with("phub-file-logging"), "{name}");

    let content = fs::read_to_string(&log_file)?;
    assert!(content.contains("Location catalog loaded"));
    assert!(content.contains("postal_code=\"110001\""));
    assert!(!content.contains("filtered out"));
    assert!(!content.trim_start().starts_with('{'));

    Ok(())
}
