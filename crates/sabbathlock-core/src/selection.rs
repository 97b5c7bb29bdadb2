//! The user's blocked-target selection.
//!
//! Tokens are opaque identifiers handed over by the platform picker; the core
//! only counts them and passes them through to the enforcer.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Three unordered sets of opaque target tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub applications: BTreeSet<String>,
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub web_domains: BTreeSet<String>,
}

/// Which of the three token sets a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    App,
    Category,
    Domain,
}

impl Selection {
    pub fn app_count(&self) -> usize {
        self.applications.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn web_domain_count(&self) -> usize {
        self.web_domains.len()
    }

    pub fn total_count(&self) -> usize {
        self.app_count() + self.category_count() + self.web_domain_count()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }

    pub fn insert(&mut self, kind: TargetKind, token: &str) -> bool {
        self.set_mut(kind).insert(token.to_string())
    }

    pub fn remove(&mut self, kind: TargetKind, token: &str) -> bool {
        self.set_mut(kind).remove(token)
    }

    fn set_mut(&mut self, kind: TargetKind) -> &mut BTreeSet<String> {
        match kind {
            TargetKind::App => &mut self.applications,
            TargetKind::Category => &mut self.categories,
            TargetKind::Domain => &mut self.web_domains,
        }
    }

    /// Human-readable summary of the current selection.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No apps selected".into();
        }
        let mut parts: Vec<String> = Vec::new();
        let apps = self.app_count();
        if apps > 0 {
            parts.push(format!("{apps} app{}", if apps == 1 { "" } else { "s" }));
        }
        let cats = self.category_count();
        if cats > 0 {
            parts.push(format!(
                "{cats} categor{}",
                if cats == 1 { "y" } else { "ies" }
            ));
        }
        let domains = self.web_domain_count();
        if domains > 0 {
            parts.push(format!(
                "{domains} website{}",
                if domains == 1 { "" } else { "s" }
            ));
        }
        parts.join(", ")
    }
}
