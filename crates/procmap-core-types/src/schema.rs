//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Mapping identifiers
pub const FIELD_SHAPE: &str = "shape";
pub const FIELD_PROCEDURE: &str = "procedure";
pub const FIELD_PARAM_COUNT: &str = "param_count";

// Collection sizes
pub const FIELD_ROW_COUNT: &str = "row_count";
pub const FIELD_BATCH_LEN: &str = "batch_len";
pub const FIELD_ROW_INDEX: &str = "row_index";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_ROW_FAILED: &str = "row_failed";
