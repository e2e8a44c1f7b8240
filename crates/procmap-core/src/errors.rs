use thiserror::Error;

/// Result type alias using MapError
pub type Result<T> = std::result::Result<T, MapError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every [`MapError`] falls into exactly one kind. Each kind maps to a stable
/// error code that can be used for programmatic handling, log assertions and
/// external reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Shape metadata does not describe a valid field order
    Resolution,
    /// A record does not expose a field its shape metadata names
    FieldAccess,
    /// The connection collaborator failed to run a statement
    Execution,
    /// A result row could not be bound into an output record
    Scan,
    /// Begin, commit or rollback failed
    Transaction,
    InvalidInput,
    Config,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Resolution => "ERR_RESOLUTION",
            ExErrorKind::FieldAccess => "ERR_FIELD_ACCESS",
            ExErrorKind::Execution => "ERR_EXECUTION",
            ExErrorKind::Scan => "ERR_SCAN",
            ExErrorKind::Transaction => "ERR_TRANSACTION",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error view
///
/// Built from any [`MapError`]; carries the classification fields the logging
/// facility records alongside the human-readable message.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    shape: Option<String>,
    field: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            shape: None,
            field: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add shape context
    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    /// Add field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn shape(&self) -> Option<&str> {
        self.shape.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(shape) = &self.shape {
            write!(f, " (shape: {})", shape)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for the mapping engine
///
/// Errors are returned by the stage that raised them; the repository façade
/// passes them through untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    // ===== Resolution Errors =====
    /// A field's order annotation is not a positive integer
    #[error("Shape {shape}: field {field} has invalid order {value:?}")]
    InvalidOrder {
        shape: String,
        field: String,
        value: String,
    },

    /// Two fields claim the same position
    #[error("Shape {shape}: fields {first} and {second} both claim order {order}")]
    DuplicateOrder {
        shape: String,
        order: usize,
        first: String,
        second: String,
    },

    /// A populated position follows an empty one
    #[error("Shape {shape}: order is not contiguous, missing order number {missing}")]
    NonContiguousOrder { shape: String, missing: usize },

    /// Position 1 is not claimed by any field
    #[error("Shape {shape}: order does not start with 1")]
    OrderNotStartingAtOne { shape: String },

    /// No field of the shape carries an order annotation
    #[error("Shape {shape} has no field specified with order")]
    NoOrderedFields { shape: String },

    // ===== Binding Errors =====
    /// The record does not expose a field named by its resolved sequence
    #[error("Shape {shape} has no accessible field {field}")]
    FieldAccess { shape: String, field: String },

    /// Row-to-field binding failed
    #[error("Scan failed at column {column} ({field}): {message}")]
    Scan {
        column: usize,
        field: String,
        message: String,
    },

    // ===== Collaborator Errors =====
    /// The connection failed to run a statement
    #[error("Execution of `{statement}` failed: {message}")]
    Execution { statement: String, message: String },

    /// Begin, commit or rollback failed
    #[error("Transaction {action} failed: {message}")]
    Transaction { action: String, message: String },

    // ===== Input / Config Errors =====
    #[error("Batch insert requires at least one record")]
    EmptyBatch,

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl MapError {
    pub fn execution(statement: impl Into<String>, message: impl Into<String>) -> Self {
        MapError::Execution {
            statement: statement.into(),
            message: message.into(),
        }
    }

    pub fn transaction(action: impl Into<String>, message: impl Into<String>) -> Self {
        MapError::Transaction {
            action: action.into(),
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            MapError::InvalidOrder { .. }
            | MapError::DuplicateOrder { .. }
            | MapError::NonContiguousOrder { .. }
            | MapError::OrderNotStartingAtOne { .. }
            | MapError::NoOrderedFields { .. } => ExErrorKind::Resolution,
            MapError::FieldAccess { .. } => ExErrorKind::FieldAccess,
            MapError::Scan { .. } => ExErrorKind::Scan,
            MapError::Execution { .. } => ExErrorKind::Execution,
            MapError::Transaction { .. } => ExErrorKind::Transaction,
            MapError::EmptyBatch => ExErrorKind::InvalidInput,
            MapError::Config { .. } => ExErrorKind::Config,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// True for shape-metadata defects (never retried)
    pub fn is_resolution(&self) -> bool {
        self.kind() == ExErrorKind::Resolution
    }
}

impl From<MapError> for ExError {
    fn from(err: MapError) -> Self {
        let base = ExError::new(err.kind()).with_message(err.to_string());
        match err {
            MapError::InvalidOrder { shape, field, .. }
            | MapError::FieldAccess { shape, field } => base.with_shape(shape).with_field(field),
            MapError::DuplicateOrder { shape, second, .. } => {
                base.with_shape(shape).with_field(second)
            }
            MapError::NonContiguousOrder { shape, .. }
            | MapError::OrderNotStartingAtOne { shape }
            | MapError::NoOrderedFields { shape } => base.with_shape(shape).with_op("resolve"),
            MapError::Scan { field, .. } => base.with_field(field).with_op("scan"),
            MapError::Execution { .. } => base.with_op("execute"),
            MapError::Transaction { action, .. } => base.with_op(action),
            MapError::EmptyBatch => base.with_op("batch_insert"),
            MapError::Config { .. } => base.with_op("config"),
        }
    }
}

impl From<&MapError> for ExError {
    fn from(err: &MapError) -> Self {
        err.clone().into()
    }
}
