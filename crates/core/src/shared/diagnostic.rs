use std::fmt;

/// Native-call context attached to a failure: which library operation
/// failed and the raw error code it returned, when known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub operation: Option<&'static str>,
    pub code: Option<i32>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            operation: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_operation(mut self, operation: &'static str) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.operation, self.code) {
            (Some(op), Some(code)) => write!(f, "{op} returned {code}: {}", self.message),
            (Some(op), None) => write!(f, "{op}: {}", self.message),
            (None, Some(code)) => write!(f, "{} (code {code})", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}
