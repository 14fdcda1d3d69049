//! Integration tests against the public API surface.

use mediamill_core::{
    CoreConfig, CoreError, EngineState, InputFile, JobRequest, format_time, parse_time,
};

#[test]
fn test_clock_round_trip_truncates_to_whole_seconds() {
    for t in [0.0, 10.0, 59.4, 65.0, 600.9, 3600.0] {
        assert_eq!(parse_time(&format_time(t)).unwrap(), t.floor());
    }
}

#[test]
fn test_clock_examples() {
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(3600.0), "60:00");
    assert_eq!(parse_time("0:10").unwrap(), 10.0);
    assert_eq!(parse_time("1:05").unwrap(), 65.0);
    assert_eq!(parse_time("12.5").unwrap(), 12.5);
}

#[test]
fn test_request_validation() {
    let input = InputFile::new("song.mp3", b"bytes".to_vec());

    let ok = JobRequest::Cut {
        input: input.clone(),
        start_secs: 5.0,
        end_secs: 15.0,
        target_format: "mp3".to_string(),
    };
    assert!(ok.validate().is_ok());

    let zero_width = JobRequest::Cut {
        input: input.clone(),
        start_secs: 5.0,
        end_secs: 5.0,
        target_format: "mp3".to_string(),
    };
    assert!(matches!(
        zero_width.validate(),
        Err(CoreError::InvalidRequest(_))
    ));

    let negative_start = JobRequest::Cut {
        input: input.clone(),
        start_secs: -1.0,
        end_secs: 5.0,
        target_format: "mp3".to_string(),
    };
    assert!(negative_start.validate().is_err());

    let join_too_few = JobRequest::Join {
        inputs: vec![input.clone()],
        target_format: "mp3".to_string(),
    };
    assert!(join_too_few.validate().is_err());

    let bad_token = JobRequest::Convert {
        input,
        target_format: "../etc".to_string(),
    };
    assert!(bad_token.validate().is_err());
}

#[test]
fn test_input_file_extension() {
    assert_eq!(InputFile::new("a.mp3", vec![]).extension(), Some("mp3"));
    assert_eq!(InputFile::new("a.b.ogg", vec![]).extension(), Some("ogg"));
    assert_eq!(InputFile::new("noext", vec![]).extension(), None);
    assert_eq!(InputFile::new(".hidden", vec![]).extension(), None);
    assert_eq!(InputFile::new("trailing.", vec![]).extension(), None);
}

#[test]
fn test_handle_starts_unloaded() {
    let handle = mediamill_core::EngineHandle::new(CoreConfig::default());
    assert_eq!(handle.state(), EngineState::Unloaded);
}
