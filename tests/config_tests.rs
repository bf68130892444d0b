use linky_tic::decoder::{DecoderOptions, ReaderSettings};
use linky_tic::{TicConfig, TicError, TicMode};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"{
            "port": "/dev/ttyACM0",
            "mode": "standard",
            "producer": true,
            "three_phase": true,
            "realtime": true,
            "read_timeout_ms": 500,
            "reconnect_delay_ms": 2000
        }"#,
    );
    let config = TicConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, "/dev/ttyACM0");
    assert_eq!(config.mode, TicMode::Standard);
    assert!(config.producer);

    let serial = config.serial_config();
    assert_eq!(serial.baudrate(), 9600);
    assert_eq!(serial.timeout, Duration::from_millis(500));

    let options = DecoderOptions::from(&config);
    assert!(options.three_phase);
    assert!(options.realtime);
    assert!(options.producer);

    let settings = ReaderSettings::from(&config);
    assert_eq!(settings.reconnect_delay, Duration::from_secs(2));
}

#[test]
fn test_partial_config_file() {
    let file = write_config(r#"{"mode": "historic", "producer": true}"#);
    let config = TicConfig::from_file(file.path()).unwrap();
    assert_eq!(config.port, "/dev/ttyUSB0");
    assert!(!config.producer);
    assert_eq!(config.read_timeout(), Duration::from_secs(1));
}

#[test]
fn test_config_errors() {
    let file = write_config("not json");
    assert!(matches!(
        TicConfig::from_file(file.path()),
        Err(TicError::Config(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        TicConfig::from_file(dir.path().join("missing.json")),
        Err(TicError::Config(_))
    ));
}

#[test]
fn test_config_round_trip_through_json() {
    let config = TicConfig::new("/dev/ttyS1", TicMode::Standard);
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""mode":"standard""#));
    assert_eq!(TicConfig::from_json(&json).unwrap(), config);
}

#[test]
fn test_mode_from_str() {
    assert_eq!("std".parse::<TicMode>().unwrap(), TicMode::Standard);
    assert_eq!("Historique".parse::<TicMode>().unwrap(), TicMode::Historic);
    assert!("linky".parse::<TicMode>().is_err());
}
