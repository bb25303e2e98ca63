use std::collections::HashSet;

use crate::pulls::NormalizedRow;

/// Maintainers treated as core when no other set is configured.
pub const DEFAULT_CORE_DEVS: [&str; 7] = [
    "fperez",
    "ellisonbg",
    "takluyver",
    "ivanov",
    "jdfreder",
    "minrk",
    "Carreau",
];

/// The set of author logins counted as core contributors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreContributors(HashSet<String>);

impl CoreContributors {
    pub fn new<I, S>(logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(logins.into_iter().map(Into::into).collect())
    }

    pub fn historical() -> Self {
        Self::new(DEFAULT_CORE_DEVS)
    }

    pub fn is_core(&self, login: &str) -> bool {
        self.0.contains(login)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Counts rows by author class, returning `(core, non_core)`.
    pub fn core_non_core<'a, I>(&self, rows: I) -> (usize, usize)
    where
        I: IntoIterator<Item = &'a NormalizedRow>,
    {
        rows.into_iter().fold((0, 0), |(core, non_core), row| {
            if self.is_core(&row.user) {
                (core + 1, non_core)
            } else {
                (core, non_core + 1)
            }
        })
    }
}
