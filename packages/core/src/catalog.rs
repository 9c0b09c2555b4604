//! Grouping of registry resources into routes, services, and versions.
//!
//! The service registry advertises one resource per published schema
//! document, named `<route>:<service>` and located at
//! `<path>?version=<version>`. [`ServiceCatalog`] groups them into an ordered
//! map so every pass over the catalog visits services and versions in the
//! same order.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

const VERSION_MARKER: &str = "?version=";

/// One schema document advertised by the service registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResource {
    pub name: String,
    pub location: String,
}

impl ServiceResource {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

/// A (route, service) pair with its published versions, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub route: &'a str,
    pub service: &'a str,
    pub versions: &'a BTreeSet<String>,
}

impl CatalogEntry<'_> {
    /// The version used where a single one is needed: the first in order.
    pub fn first_version(&self) -> Option<&str> {
        self.versions.iter().next().map(String::as_str)
    }
}

/// Services grouped by (route, service), sorted, with their version sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    entries: BTreeMap<(String, String), BTreeSet<String>>,
}

impl ServiceCatalog {
    /// Group `resources`. Resources whose name is not `route:service` or
    /// whose location has no single `?version=` are skipped.
    pub fn from_resources<'r>(resources: impl IntoIterator<Item = &'r ServiceResource>) -> Self {
        let mut catalog = Self::default();
        for resource in resources {
            let names: Vec<&str> = resource.name.split(':').collect();
            let locations: Vec<&str> = resource.location.split(VERSION_MARKER).collect();
            let ([route, service], [_, version]) = (names.as_slice(), locations.as_slice()) else {
                tracing::warn!(
                    name = %resource.name,
                    location = %resource.location,
                    "resource does not match route:service at /path?version=v, skipping"
                );
                continue;
            };
            catalog.insert(route, service, version);
        }
        catalog
    }

    pub fn insert(&mut self, route: &str, service: &str, version: &str) {
        self.entries
            .entry((route.to_string(), service.to_string()))
            .or_default()
            .insert(version.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by route, then service.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.entries
            .iter()
            .map(|((route, service), versions)| CatalogEntry {
                route,
                service,
                versions,
            })
    }

    /// Distinct service ids, in entry order.
    pub fn service_ids(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries()
            .map(|e| e.service)
            .filter(|s| seen.insert(*s))
            .collect()
    }
}

// --- tests -------------------------------------------------------------------
