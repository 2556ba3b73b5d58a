// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Lowering of validated patterns into equivalent fragment sets
//!
//! Each property becomes one or more sets. Edge properties produce a set
//! holding both directions of the edge, and every referenced label gets a
//! variable of its own (`$_label-movie`) pinned by a `Label` fragment so the
//! planner can start from an index lookup.

use super::fragment::Fragment;
use super::fragment_set::{ContractViolation, EquivalentFragmentSet};
use crate::pattern::{Pattern, TypeRef, Var, VarPattern, VarProperty};

/// Lower a pattern into the sets the optimizer chooses from
pub fn lower(pattern: &Pattern) -> Result<Vec<EquivalentFragmentSet>, ContractViolation> {
    let mut lowering = Lowering::default();
    for vp in pattern.var_patterns() {
        lowering.lower_var_pattern(vp)?;
    }
    log::trace!(
        "Lowered `{}` into {} fragment sets",
        pattern,
        lowering.sets.len()
    );
    Ok(lowering.sets)
}

#[derive(Default)]
struct Lowering {
    sets: Vec<EquivalentFragmentSet>,
    next_attribute: usize,
}

impl Lowering {
    fn push(&mut self, fragments: Vec<Fragment>) -> Result<(), ContractViolation> {
        self.sets.push(EquivalentFragmentSet::new(fragments)?);
        Ok(())
    }

    /// Variable standing for a type reference, pinning labels as it goes
    fn type_var(&mut self, ty: &TypeRef) -> Result<Var, ContractViolation> {
        match ty {
            TypeRef::Var(var) => Ok(var.clone()),
            TypeRef::Label(label) => {
                let var = Var::generated(&format!("label-{}", label));
                self.push(vec![Fragment::label(var.clone(), label.as_str())])?;
                Ok(var)
            }
        }
    }

    fn fresh_attribute(&mut self) -> Var {
        let var = Var::generated(&format!("attr{}", self.next_attribute));
        self.next_attribute += 1;
        var
    }

    fn lower_var_pattern(&mut self, vp: &VarPattern) -> Result<(), ContractViolation> {
        let x = vp.var();
        for property in vp.properties() {
            match property {
                VarProperty::Isa(ty) => {
                    let t = self.type_var(ty)?;
                    self.push(vec![
                        Fragment::out_isa(x.clone(), t.clone()),
                        Fragment::in_isa(t, x.clone()),
                    ])?;
                }
                VarProperty::Sub(ty) => {
                    let t = self.type_var(ty)?;
                    self.push(vec![
                        Fragment::out_sub(x.clone(), t.clone()),
                        Fragment::in_sub(t, x.clone()),
                    ])?;
                }
                VarProperty::Relates(role) => {
                    let r = self.type_var(role)?;
                    self.push(vec![
                        Fragment::out_relates(x.clone(), r.clone()),
                        Fragment::in_relates(r, x.clone()),
                    ])?;
                }
                VarProperty::Plays(role) => {
                    let r = self.type_var(role)?;
                    self.push(vec![
                        Fragment::out_plays(x.clone(), r.clone()),
                        Fragment::in_plays(r, x.clone()),
                    ])?;
                }
                VarProperty::Label(label) => {
                    self.push(vec![Fragment::label(x.clone(), label.as_str())])?;
                }
                VarProperty::Id(id) => {
                    self.push(vec![Fragment::id(x.clone(), id.as_str())])?;
                }
                VarProperty::Value(predicate) => {
                    self.push(vec![Fragment::value(x.clone(), predicate.clone())])?;
                }
                VarProperty::Has {
                    attribute_type,
                    attribute,
                    predicate,
                } => {
                    let a = match attribute {
                        Some(a) => a.clone(),
                        None => self.fresh_attribute(),
                    };
                    self.push(vec![
                        Fragment::out_has(x.clone(), a.clone(), attribute_type.as_str()),
                        Fragment::in_has(a.clone(), x.clone(), attribute_type.as_str()),
                    ])?;
                    if let Some(predicate) = predicate {
                        self.push(vec![Fragment::value(a, predicate.clone())])?;
                    }
                }
                VarProperty::Rel(rp) => {
                    let role_var = match &rp.role {
                        Some(role) => Some(self.type_var(role)?),
                        None => None,
                    };
                    let role_label = rp.role.as_ref().and_then(|r| r.label()).map(str::to_string);
                    self.push(vec![
                        Fragment::out_role_player(
                            x.clone(),
                            rp.player.clone(),
                            role_var.clone(),
                            role_label.clone(),
                        ),
                        Fragment::in_role_player(rp.player.clone(), x.clone(), role_var, role_label),
                    ])?;
                }
                VarProperty::DataType(data_type) => {
                    self.push(vec![Fragment::data_type(x.clone(), *data_type)])?;
                }
                VarProperty::IsAbstract => {
                    self.push(vec![Fragment::is_abstract(x.clone())])?;
                }
                VarProperty::Regex(regex) => {
                    self.push(vec![Fragment::regex(x.clone(), regex.as_str())])?;
                }
                VarProperty::Neq(other) => {
                    self.push(vec![
                        Fragment::neq(x.clone(), other.clone()),
                        Fragment::neq(other.clone(), x.clone()),
                    ])?;
                }
            }
        }
        Ok(())
    }
}
