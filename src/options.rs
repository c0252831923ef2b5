//src/options.rs

/// What to do when a single leaf line cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Stop the conversion at the first bad line.
    #[default]
    Abort,
    /// Drop the row, log it at `warn` and record a diagnostic on the table.
    SkipRow,
}

/// Settings shared by every conversion entry point.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub error_policy: ErrorPolicy,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }
}
