//! Expansion targets.

/// What an expanded world should look like.
///
/// # Example
///
/// ```
/// use worldbench_expand::ExpansionConfig;
///
/// let config = ExpansionConfig::new(25, 6, 4).with_success_endings(4);
/// assert_eq!(config.success_ending_count(), 4);
/// assert_eq!(config.failure_ending_count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionConfig {
    target_state_count: usize,
    target_ending_count: usize,
    branch_point_count: usize,
    success_endings: Option<usize>,
    name_suffix: String,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self::new(20, 5, 3)
    }
}

impl ExpansionConfig {
    /// Creates a configuration with the given state, ending and branch-point targets.
    #[must_use]
    pub fn new(
        target_state_count: usize,
        target_ending_count: usize,
        branch_point_count: usize,
    ) -> Self {
        Self {
            target_state_count,
            target_ending_count,
            branch_point_count,
            success_endings: None,
            name_suffix: "_branching".to_owned(),
        }
    }

    /// Sets how many endings are goals. The canonical goal counts as one.
    #[must_use]
    pub fn with_success_endings(mut self, success_endings: usize) -> Self {
        self.success_endings = Some(success_endings);
        self
    }

    /// Sets the suffix that replaces `_linear` in the expanded world's name.
    #[must_use]
    pub fn with_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.name_suffix = suffix.into();
        self
    }

    /// Returns the exact number of states the expanded world will have.
    #[must_use]
    pub fn target_state_count(&self) -> usize {
        self.target_state_count
    }

    /// Returns the exact number of terminal states the expanded world will have.
    #[must_use]
    pub fn target_ending_count(&self) -> usize {
        self.target_ending_count
    }

    /// Returns the number of canonical states that become branch points.
    #[must_use]
    pub fn branch_point_count(&self) -> usize {
        self.branch_point_count
    }

    /// Returns the number of goal endings.
    ///
    /// Defaults to three fifths of the endings, rounded up, and at least one.
    #[must_use]
    pub fn success_ending_count(&self) -> usize {
        self.success_endings
            .unwrap_or_else(|| (self.target_ending_count * 3).div_ceil(5).max(1))
    }

    /// Returns the number of failure endings.
    #[must_use]
    pub fn failure_ending_count(&self) -> usize {
        self.target_ending_count
            .saturating_sub(self.success_ending_count())
    }

    /// Returns the name suffix of the expanded world.
    #[must_use]
    pub fn name_suffix(&self) -> &str {
        &self.name_suffix
    }

    /// Derives the expanded world's name from the source name.
    #[must_use]
    pub fn expanded_name(&self, source: &str) -> String {
        let stem = source.strip_suffix("_linear").unwrap_or(source);
        format!("{stem}{}", self.name_suffix)
    }
}
