// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cost estimation for fragments
//!
//! Costs come from a fixed cardinality model rather than collected
//! statistics. A fragment whose start variable is already bound costs its
//! expected fan-out; an unanchored fragment has to scan instances of some
//! type first and then expand every candidate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::fragment::{Fragment, FragmentKind};
use crate::pattern::Var;

/// Heuristic cardinality constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    pub instances_per_type: f64,
    pub instances_per_scope: f64,
    pub relations_per_casting: f64,
    pub subtypes_per_type: f64,
    pub castings_per_instance: f64,
    pub scopes_per_instance: f64,
    pub types_per_role: f64,
    pub roles_per_type: f64,
    pub role_players_per_relation: f64,
    pub role_players_per_role: f64,
    pub resources_per_value: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            instances_per_type: 100.0,
            instances_per_scope: 100.0,
            relations_per_casting: 10.0,
            subtypes_per_type: 3.0,
            castings_per_instance: 3.0,
            scopes_per_instance: 3.0,
            types_per_role: 3.0,
            roles_per_type: 3.0,
            role_players_per_relation: 2.0,
            role_players_per_role: 1.0,
            resources_per_value: 2.0,
        }
    }
}

impl CostModel {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Relations an instance takes part in, through any of its castings
    pub fn relations_per_instance(&self) -> f64 {
        self.relations_per_casting * self.castings_per_instance
    }

    /// Every constant must be a positive finite number
    pub fn validate(&self) -> Result<(), String> {
        let constants = [
            ("instances_per_type", self.instances_per_type),
            ("instances_per_scope", self.instances_per_scope),
            ("relations_per_casting", self.relations_per_casting),
            ("subtypes_per_type", self.subtypes_per_type),
            ("castings_per_instance", self.castings_per_instance),
            ("scopes_per_instance", self.scopes_per_instance),
            ("types_per_role", self.types_per_role),
            ("roles_per_type", self.roles_per_type),
            ("role_players_per_relation", self.role_players_per_relation),
            ("role_players_per_role", self.role_players_per_role),
            ("resources_per_value", self.resources_per_value),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, value));
            }
        }
        Ok(())
    }
}

/// Estimates the cost of running a fragment given the variables bound so far
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator<'a> {
    model: &'a CostModel,
}

impl<'a> CostEstimator<'a> {
    pub fn new(model: &'a CostModel) -> Self {
        Self { model }
    }

    pub fn cost(&self, fragment: &Fragment, bound: &BTreeSet<Var>) -> f64 {
        let anchored = bound.contains(fragment.start());
        match fragment.kind() {
            FragmentKind::Label(_) | FragmentKind::Id(_) => 1.0,
            FragmentKind::Value(predicate) => {
                if anchored {
                    1.0
                } else if predicate.is_indexable() {
                    self.model.resources_per_value
                } else {
                    self.scan(1.0)
                }
            }
            kind if !kind.is_traversal() => {
                if anchored {
                    1.0
                } else {
                    self.scan(1.0)
                }
            }
            kind => {
                let fan_out = self.fan_out(kind);
                if anchored {
                    fan_out
                } else {
                    self.scan(fan_out)
                }
            }
        }
    }

    /// Expected number of end concepts per start concept
    pub fn fan_out(&self, kind: &FragmentKind) -> f64 {
        let m = self.model;
        match kind {
            FragmentKind::OutIsa | FragmentKind::InRelates => 1.0,
            FragmentKind::InIsa => m.instances_per_type,
            FragmentKind::OutSub | FragmentKind::InSub => m.subtypes_per_type,
            FragmentKind::OutRelates => m.role_players_per_relation,
            FragmentKind::OutPlays => m.roles_per_type,
            FragmentKind::InPlays => m.types_per_role,
            FragmentKind::OutRolePlayer { role: Some(_) } => m.role_players_per_role,
            FragmentKind::OutRolePlayer { role: None } => m.role_players_per_relation,
            FragmentKind::InRolePlayer { .. } => m.relations_per_instance(),
            FragmentKind::OutHas { .. } => m.castings_per_instance,
            FragmentKind::InHas { .. } => m.relations_per_casting,
            _ => 1.0,
        }
    }

    fn scan(&self, fan_out: f64) -> f64 {
        self.model.instances_per_type * (1.0 + fan_out)
    }
}
