//! Static error catalog
//!
//! Maps subsystem codes to human-readable descriptions. Codes `0..N-1` are
//! device subsystems; the last entry is the fallback used when a failed message
//! carries no subsystem flag at all.

/// Descriptions indexed by code. The last entry is the fallback.
static ERROR_MESSAGES: [&str; 4] = [
    "Battery device error",
    "Temperature device error",
    "Threshold central error",
    "Unknown device error",
];

static STANDARD_CATALOG: ErrorCatalog = ErrorCatalog {
    entries: &ERROR_MESSAGES,
};

/// Read-only table of error descriptions
#[derive(Debug, Clone, Copy)]
pub struct ErrorCatalog {
    entries: &'static [&'static str],
}

impl ErrorCatalog {
    /// The process-wide catalog
    pub fn standard() -> &'static ErrorCatalog {
        &STANDARD_CATALOG
    }

    /// Description for a subsystem code, or `None` if the code has no subsystem
    pub fn description(&self, code: usize) -> Option<&'static str> {
        if code < self.subsystem_count() {
            self.entries.get(code).copied()
        } else {
            None
        }
    }

    /// Description used when no subsystem flag is set
    pub fn fallback(&self) -> &'static str {
        self.entries[self.entries.len() - 1]
    }

    /// Number of subsystems that can be flagged
    pub fn subsystem_count(&self) -> usize {
        self.entries.len() - 1
    }

    /// Subsystem codes with their descriptions, in code order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'static str)> + '_ {
        self.entries[..self.subsystem_count()]
            .iter()
            .copied()
            .enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog() {
        let catalog = ErrorCatalog::standard();
        assert_eq!(catalog.subsystem_count(), 3);
        assert_eq!(catalog.description(0), Some("Battery device error"));
        assert_eq!(catalog.description(1), Some("Temperature device error"));
        assert_eq!(catalog.description(2), Some("Threshold central error"));
        assert_eq!(catalog.fallback(), "Unknown device error");
    }

    #[test]
    fn test_fallback_is_not_a_subsystem() {
        let catalog = ErrorCatalog::standard();
        assert_eq!(catalog.description(3), None);
        assert_eq!(catalog.description(42), None);

        let codes: Vec<usize> = catalog.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![0, 1, 2]);
    }
}
