// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-subject snapshot of granted verbs on group/resources.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Matches any verb, group, resource, namespace or name.
pub const ALL: &str = "*";

/// A backend resource type identifier, e.g. `apps/deployments`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }

    fn matches(&self, other: &GroupResource) -> bool {
        (self.group == ALL || self.group == other.group)
            && (self.resource == ALL || self.resource == other.resource)
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Namespace and object name a grant applies to; `*` means any.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Access {
    pub namespace: String,
    pub resource_name: String,
}

impl Access {
    pub fn new(namespace: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            resource_name: resource_name.into(),
        }
    }

    /// Access to every object in every namespace.
    pub fn all() -> Self {
        Self::new(ALL, ALL)
    }
}

pub type AccessList = Vec<Access>;

/// Access rules per verb for a single group/resource. An absent verb is not visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessListByVerb(BTreeMap<String, AccessList>);

impl AccessListByVerb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, verb: impl Into<String>, access: AccessList) {
        self.0.insert(verb.into(), access);
    }

    pub fn get(&self, verb: &str) -> Option<&AccessList> {
        self.0.get(verb)
    }

    pub fn any_verb(&self, verbs: &[&str]) -> bool {
        verbs.iter().any(|v| self.0.contains_key(*v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn verbs(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct GrantKey {
    verb: String,
    gr: GroupResource,
}

/// Everything a subject may do, keyed by verb and group/resource.
#[derive(Debug, Clone, Default)]
pub struct AccessSet {
    grants: BTreeMap<GrantKey, BTreeSet<Access>>,
}

impl AccessSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, verb: impl Into<String>, gr: GroupResource, access: Access) {
        self.grants
            .entry(GrantKey {
                verb: verb.into(),
                gr,
            })
            .or_default()
            .insert(access);
    }

    pub fn with(mut self, verb: impl Into<String>, gr: GroupResource, access: Access) -> Self {
        self.add(verb, gr, access);
        self
    }

    /// Stable identity of the grants. Two sets holding the same grants share an ID,
    /// regardless of insertion order.
    pub fn id(&self) -> String {
        let mut hasher = Sha256::new();
        for (key, accesses) in &self.grants {
            for access in accesses {
                for part in [
                    key.verb.as_str(),
                    key.gr.group.as_str(),
                    key.gr.resource.as_str(),
                    access.namespace.as_str(),
                    access.resource_name.as_str(),
                ] {
                    hasher.update(part.as_bytes());
                    hasher.update([0u8]);
                }
                hasher.update([b'\n']);
            }
        }
        hex::encode(hasher.finalize())
    }

    /// Rules granting `verb` on `gr`, including wildcard grants. Empty means denied.
    pub fn access_list_for(&self, verb: &str, gr: &GroupResource) -> AccessList {
        let mut result = BTreeSet::new();
        for (key, accesses) in &self.grants {
            if (key.verb == ALL || key.verb == verb) && key.gr.matches(gr) {
                result.extend(accesses.iter().cloned());
            }
        }
        result.into_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widgets() -> GroupResource {
        GroupResource::new("example.io", "widgets")
    }

    #[test]
    fn test_access_list_for_exact_match() {
        let set = AccessSet::new().with("get", widgets(), Access::new("default", ALL));

        let list = set.access_list_for("get", &widgets());
        assert_eq!(list, vec![Access::new("default", ALL)]);
        assert!(set.access_list_for("delete", &widgets()).is_empty());
        assert!(set
            .access_list_for("get", &GroupResource::new("example.io", "gadgets"))
            .is_empty());
    }

    #[test]
    fn test_access_list_for_wildcards() {
        let set = AccessSet::new()
            .with(ALL, GroupResource::new("example.io", ALL), Access::all())
            .with("list", GroupResource::new(ALL, ALL), Access::new("team-a", ALL));

        assert_eq!(set.access_list_for("delete", &widgets()), vec![Access::all()]);
        assert!(set
            .access_list_for("delete", &GroupResource::new("", "pods"))
            .is_empty());
        assert_eq!(
            set.access_list_for("list", &GroupResource::new("", "pods")),
            vec![Access::new("team-a", ALL)]
        );
    }

    #[test]
    fn test_id_is_order_independent() {
        let a = AccessSet::new()
            .with("get", widgets(), Access::all())
            .with("list", widgets(), Access::all());
        let b = AccessSet::new()
            .with("list", widgets(), Access::all())
            .with("get", widgets(), Access::all());

        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_differs_for_different_grants() {
        let a = AccessSet::new().with("get", widgets(), Access::all());
        let b = AccessSet::new().with("get", widgets(), Access::new("default", ALL));

        assert_ne!(a.id(), b.id());
        assert!(AccessSet::new().is_empty());
        assert_eq!(AccessSet::new().id(), AccessSet::default().id());
    }

    #[test]
    fn test_access_list_by_verb_any_verb() {
        let mut by_verb = AccessListByVerb::new();
        by_verb.insert("get", vec![Access::all()]);

        assert!(by_verb.any_verb(&["list", "get"]));
        assert!(!by_verb.any_verb(&["delete"]));
        assert_eq!(by_verb.verbs().collect::<Vec<_>>(), vec!["get"]);
    }
}
