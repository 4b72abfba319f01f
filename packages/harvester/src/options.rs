//! Per-call harvest options and their normalization against configured
//! defaults.

use crate::oai::HarvestArguments;

/// Per-call overrides for the OAI listing arguments.
///
/// Each key has three states: absent (`None`, use the configured default),
/// explicitly unset (`Some(None)`, send nothing even if a default exists),
/// or a value (`Some(Some(v))`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestOptions {
    pub metadata_prefix: Option<Option<String>>,
    pub from: Option<Option<String>>,
    pub until: Option<Option<String>>,
    pub set: Option<Option<String>>,
}

impl HarvestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn metadata_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.metadata_prefix = Some(Some(prefix.into()));
        self
    }

    #[must_use]
    pub fn from_date(mut self, date: impl Into<String>) -> Self {
        self.from = Some(Some(date.into()));
        self
    }

    #[must_use]
    pub fn until_date(mut self, date: impl Into<String>) -> Self {
        self.until = Some(Some(date.into()));
        self
    }

    #[must_use]
    pub fn set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(Some(set.into()));
        self
    }

    /// Suppress the configured `from` default.
    #[must_use]
    pub fn without_from(mut self) -> Self {
        self.from = Some(None);
        self
    }

    /// Suppress the configured `until` default.
    #[must_use]
    pub fn without_until(mut self) -> Self {
        self.until = Some(None);
        self
    }

    /// Suppress the configured `set` default.
    #[must_use]
    pub fn without_set(mut self) -> Self {
        self.set = Some(None);
        self
    }
}

/// Merge overrides with defaults and drop empty values.
///
/// A key present in `overrides` wins even when its value is `None`; an
/// absent key falls back to `defaults`. Keys whose resolved value is `None`
/// or the empty string are left out.
///
/// # Examples
/// ```
/// use dor_harvester::oai::HarvestArguments;
/// use dor_harvester::options::{normalize, HarvestOptions};
///
/// let defaults = HarvestArguments {
///     metadata_prefix: Some("mods".to_string()),
///     from: Some("2012-01-01".to_string()),
///     ..HarvestArguments::default()
/// };
/// let args = normalize(&HarvestOptions::new().without_from(), &defaults);
/// assert_eq!(args.metadata_prefix.as_deref(), Some("mods"));
/// assert_eq!(args.from, None);
/// ```
#[must_use]
pub fn normalize(overrides: &HarvestOptions, defaults: &HarvestArguments) -> HarvestArguments {
    HarvestArguments {
        metadata_prefix: resolve(&overrides.metadata_prefix, &defaults.metadata_prefix),
        from: resolve(&overrides.from, &defaults.from),
        until: resolve(&overrides.until, &defaults.until),
        set: resolve(&overrides.set, &defaults.set),
    }
}

fn resolve(value: &Option<Option<String>>, default: &Option<String>) -> Option<String> {
    let resolved = match value {
        Some(explicit) => explicit,
        None => default,
    };
    resolved.as_ref().filter(|v| !v.is_empty()).cloned()
}
