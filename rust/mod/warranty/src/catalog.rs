//! Selectable service labels.
//!
//! The catalog is a base list fixed by configuration plus ad hoc labels an
//! operator adds at runtime. Only ad hoc labels can be removed.

use serde::Serialize;

/// Base labels used when configuration does not name any.
pub const DEFAULT_BASE_SERVICES: &[&str] = &[
    "Boya Koruma Filmi (PPF)",
    "Renk Değişimi",
    "Cam Filmi",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub label: String,
    pub base: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    base: Vec<String>,
    extra: Vec<String>,
}

impl ServiceCatalog {
    /// Build a catalog from base labels. Blank and repeated labels are dropped.
    pub fn new<I, S>(base: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels: Vec<String> = Vec::new();
        for label in base {
            let label = label.into().trim().to_string();
            if !label.is_empty() && !labels.contains(&label) {
                labels.push(label);
            }
        }
        Self { base: labels, extra: Vec::new() }
    }

    pub fn with_default_base() -> Self {
        Self::new(DEFAULT_BASE_SERVICES.iter().copied())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.is_base(label) || self.extra.iter().any(|l| l == label)
    }

    pub fn is_base(&self, label: &str) -> bool {
        self.base.iter().any(|l| l == label)
    }

    /// Add an ad hoc label. Returns false if it is blank or already listed.
    pub fn add_extra(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.contains(label) {
            return false;
        }
        self.extra.push(label.to_string());
        true
    }

    /// Remove an ad hoc label. Returns false if it was not an ad hoc label.
    pub fn remove_extra(&mut self, label: &str) -> bool {
        let before = self.extra.len();
        self.extra.retain(|l| l != label);
        self.extra.len() != before
    }

    /// Base labels first, then ad hoc labels in insertion order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.base
            .iter()
            .map(|l| CatalogEntry { label: l.clone(), base: true })
            .chain(self.extra.iter().map(|l| CatalogEntry { label: l.clone(), base: false }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base() {
        let catalog = ServiceCatalog::with_default_base();
        assert!(catalog.contains("Cam Filmi"));
        assert!(catalog.is_base("Renk Değişimi"));
        assert_eq!(catalog.entries().len(), 3);
    }

    #[test]
    fn base_labels_are_trimmed_and_deduplicated() {
        let catalog = ServiceCatalog::new([" PPF ", "PPF", "", "Cam Filmi"]);
        let labels: Vec<String> = catalog.entries().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["PPF".to_string(), "Cam Filmi".to_string()]);
    }

    #[test]
    fn add_and_remove_extra() {
        let mut catalog = ServiceCatalog::new(["PPF"]);
        assert!(catalog.add_extra("  Seramik Kaplama "));
        assert!(catalog.contains("Seramik Kaplama"));
        assert!(!catalog.add_extra("Seramik Kaplama"));
        assert!(!catalog.add_extra("PPF"));
        assert!(!catalog.add_extra("   "));

        let entries = catalog.entries();
        assert_eq!(entries[1], CatalogEntry { label: "Seramik Kaplama".into(), base: false });

        assert!(catalog.remove_extra("Seramik Kaplama"));
        assert!(!catalog.contains("Seramik Kaplama"));
    }

    #[test]
    fn base_labels_cannot_be_removed() {
        let mut catalog = ServiceCatalog::new(["PPF"]);
        assert!(!catalog.remove_extra("PPF"));
        assert!(catalog.contains("PPF"));
    }
}
