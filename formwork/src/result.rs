//! Outcome values for validation and submission.

/// Arbitrary data returned by a submit handler.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Outcome of one validator, or of a whole field validation pass.
///
/// A valid result may still carry a message (feedback text for the valid
/// state). An invalid result without a message is back-filled with the
/// field's default invalid message before it is surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    valid: bool,
    message: String,
}

impl ValidationResult {
    /// Create a result with an explicit validity and message.
    pub fn new(valid: bool, message: impl Into<String>) -> Self {
        Self {
            valid,
            message: message.into(),
        }
    }

    /// A passing result.
    pub fn valid(message: impl Into<String>) -> Self {
        Self::new(true, message)
    }

    /// A failing result.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(false, message)
    }

    /// Check if the value passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Check if the value failed.
    pub fn is_invalid(&self) -> bool {
        !self.valid
    }

    /// Check if a non-empty message is attached.
    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }

    /// Get the message (may be empty).
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Copy of this result carrying a different message.
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self::new(self.valid, message)
    }
}

impl From<bool> for ValidationResult {
    fn from(valid: bool) -> Self {
        Self::new(valid, "")
    }
}

/// Outcome of the external submit handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionResult {
    success: bool,
    payload: Payload,
}

impl SubmissionResult {
    /// Create a result with an empty payload.
    pub fn new(success: bool) -> Self {
        Self {
            success,
            payload: Payload::new(),
        }
    }

    /// A successful submission with an empty payload.
    pub fn success() -> Self {
        Self::new(true)
    }

    /// A failed submission with an empty payload.
    pub fn failure() -> Self {
        Self::new(false)
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// Attach a payload from a JSON object. Non-object values are ignored.
    pub fn with_json(self, value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => self.with_payload(map),
            _ => self,
        }
    }

    /// Check if the handler reported success.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the payload.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Take the payload.
    pub fn into_payload(self) -> Payload {
        self.payload
    }
}
