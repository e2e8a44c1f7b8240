#![allow(clippy::unwrap_used, clippy::expect_used)]

use procmap_core::errors::{ExErrorKind, MapError};
use procmap_core::logging_facility::test_capture::init_test_capture;
use procmap_core::{log_op_end, log_op_error, log_op_start};
use procmap_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, procedure = "create_user");

    let start_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1);
    assert_eq!(
        start_events[0].fields.get("procedure"),
        Some(&"create_user".to_string())
    );
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = MapError::NoOrderedFields {
        shape: "Plain".to_string(),
    };
    log_op_error!(op_name, &err, duration_ms = 10);

    let error_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1);
    let event = &error_events[0];
    assert_eq!(
        event.fields.get("err_kind"),
        Some(&format!("{:?}", ExErrorKind::Resolution))
    );
    assert_eq!(event.fields.get("err_code"), Some(&"ERR_RESOLUTION".to_string()));
    assert!(event.fields.get("message").unwrap().contains("Plain"));
}

#[test]
fn test_component_is_module_path() {
    let capture = init_test_capture();
    let op_name = "test_component_unique_4";

    log_op_start!(op_name);

    let events = capture.events_with("op", op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].component.as_deref(),
        Some("logging_facility_tests")
    );
}
