use phub_domain::config::LoggingConfig;
use phub_logger::{Logger, LoggerError};

#[test]
fn console_only_then_second_init_is_refused() {
    let logger = Logger::from_config("phub-first", &LoggingConfig::default())
        .expect("first init should succeed");
    assert!(!logger.writes_files(), "no directory means console only");

    let err = Logger::from_config("phub-second", &LoggingConfig::default())
        .expect_err("second init should fail");
    assert!(matches!(err, LoggerError::Subscriber { .. }), "{err}");
}
