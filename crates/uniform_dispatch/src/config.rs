//! Dispatcher configuration.

/// Tunables for a [`Dispatcher`](crate::Dispatcher).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatcherConfig {
    /// Resolve command names and aliases without regard to ASCII case.
    pub ignore_command_case: bool,
    /// Trim trailing whitespace before executing.
    pub trim_trailing_whitespace: bool,
    /// Prefix hosts put in front of usage strings.
    pub usage_prefix: String,
    /// Cap on the number of suggestions returned.
    pub max_suggestions: Option<usize>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            ignore_command_case: true,
            trim_trailing_whitespace: true,
            usage_prefix: "/".to_string(),
            max_suggestions: None,
        }
    }
}

impl DispatcherConfig {
    /// Exact input handling: case-sensitive names, no trimming.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            ignore_command_case: false,
            trim_trailing_whitespace: false,
            ..Self::default()
        }
    }

    /// Sets command name case handling.
    #[must_use]
    pub const fn with_ignore_command_case(mut self, ignore: bool) -> Self {
        self.ignore_command_case = ignore;
        self
    }

    /// Sets trailing whitespace trimming.
    #[must_use]
    pub const fn with_trim_trailing_whitespace(mut self, trim: bool) -> Self {
        self.trim_trailing_whitespace = trim;
        self
    }

    /// Sets the usage prefix.
    #[must_use]
    pub fn with_usage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.usage_prefix = prefix.into();
        self
    }

    /// Caps the number of suggestions.
    #[must_use]
    pub const fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = Some(max);
        self
    }
}
