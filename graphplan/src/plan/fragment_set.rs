// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Equivalent fragment sets and the arena that owns them during planning
//!
//! Every fragment in an [`EquivalentFragmentSet`] expresses the same logical
//! constraint, so a plan runs exactly one of them. Set membership lives in a
//! [`FragmentArena`] side table; fragments never point back at their set.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use super::fragment::Fragment;

/// Programming-contract violations
///
/// These indicate misuse of the planning API rather than a bad query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("an equivalent fragment set must contain at least one fragment")]
    EmptyFragmentSet,

    #[error("fragment {fragment} was read before being assigned to an equivalent fragment set")]
    UnassignedFragment { fragment: String },

    #[error("no equivalent fragment set with id {0}")]
    UnknownSet(SetId),
}

/// Interchangeable fragments for one logical constraint
#[derive(Debug, Clone, Serialize)]
pub struct EquivalentFragmentSet {
    fragments: Vec<Fragment>,
}

impl EquivalentFragmentSet {
    pub fn new(fragments: Vec<Fragment>) -> Result<Self, ContractViolation> {
        if fragments.is_empty() {
            return Err(ContractViolation::EmptyFragmentSet);
        }
        Ok(Self { fragments })
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn contains(&self, fragment: &Fragment) -> bool {
        self.fragments.contains(fragment)
    }

    /// Same constraint as `other`: every fragment has a duplicate on the other side
    ///
    /// Stricter than `==`, which ignores kind payloads such as role labels
    /// and value predicates.
    pub fn is_duplicate_of(&self, other: &Self) -> bool {
        let covered = |from: &Self, to: &Self| {
            from.fragments
                .iter()
                .all(|f| to.fragments.iter().any(|g| f.is_duplicate_of(g)))
        };
        covered(self, other) && covered(other, self)
    }
}

impl PartialEq for EquivalentFragmentSet {
    fn eq(&self, other: &Self) -> bool {
        self.fragments.iter().all(|f| other.contains(f))
            && other.fragments.iter().all(|f| self.contains(f))
    }
}

impl Eq for EquivalentFragmentSet {}

impl fmt::Display for EquivalentFragmentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.fragments.iter().map(|fr| fr.to_string()).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl<'a> IntoIterator for &'a EquivalentFragmentSet {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}

/// Index of a set inside a [`FragmentArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SetId(usize);

impl SetId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fragment together with the set it was registered under
#[derive(Debug, Clone, Copy)]
pub struct FragmentRef<'a> {
    pub set: SetId,
    /// Position within the owning set
    pub index: usize,
    pub fragment: &'a Fragment,
}

/// Owns the sets of one planning run and answers set membership
#[derive(Debug, Default)]
pub struct FragmentArena {
    sets: Vec<EquivalentFragmentSet>,
    /// Sets holding a fragment equal to the key, in registration order
    owners: HashMap<Fragment, Vec<SetId>>,
}

impl FragmentArena {
    /// Register sets, dropping any set that duplicates one already registered
    pub fn build(sets: impl IntoIterator<Item = EquivalentFragmentSet>) -> Self {
        let mut arena = Self::default();
        for set in sets {
            if arena.sets.iter().any(|known| known.is_duplicate_of(&set)) {
                log::trace!("Merging duplicate fragment set {}", set);
                continue;
            }
            let id = SetId(arena.sets.len());
            for fragment in set.iter() {
                arena.owners.entry(fragment.clone()).or_default().push(id);
            }
            arena.sets.push(set);
        }
        arena
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn set(&self, id: SetId) -> Result<&EquivalentFragmentSet, ContractViolation> {
        self.sets.get(id.0).ok_or(ContractViolation::UnknownSet(id))
    }

    /// The set a fragment was registered under
    pub fn owning_set(&self, fragment: &Fragment) -> Result<SetId, ContractViolation> {
        self.owners
            .get(fragment)
            .and_then(|ids| {
                ids.iter().copied().find(|id| {
                    self.sets[id.0]
                        .iter()
                        .any(|known| known.is_duplicate_of(fragment))
                })
            })
            .ok_or_else(|| ContractViolation::UnassignedFragment {
                fragment: fragment.to_string(),
            })
    }

    pub fn sets(&self) -> impl Iterator<Item = (SetId, &EquivalentFragmentSet)> {
        self.sets.iter().enumerate().map(|(i, set)| (SetId(i), set))
    }

    /// Every fragment of every set, in registration order
    pub fn fragments(&self) -> impl Iterator<Item = FragmentRef<'_>> {
        self.sets().flat_map(|(set, fragments)| {
            fragments
                .iter()
                .enumerate()
                .map(move |(index, fragment)| FragmentRef {
                    set,
                    index,
                    fragment,
                })
        })
    }
}
