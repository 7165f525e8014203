// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashMap;

use async_graphql_parser::{
    Pos, Positioned,
    types::{Directive, Field, FragmentDefinition, Selection, SelectionSet},
};
use async_graphql_value::{ConstValue, Name, Value, indexmap::IndexMap};

use super::{field::ValidatedField, validation_error::ValidationError};

/// Lowers selection sets: inlines fragments, substitutes variables, and merges fields that share
/// a response key.
pub struct SelectionSetValidator<'a> {
    variables: &'a HashMap<Name, Option<ConstValue>>,
    fragment_definitions: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    query_depth_limit: usize,
}

impl<'a> SelectionSetValidator<'a> {
    #[must_use]
    pub fn new(
        variables: &'a HashMap<Name, Option<ConstValue>>,
        fragment_definitions: &'a HashMap<Name, Positioned<FragmentDefinition>>,
        query_depth_limit: usize,
    ) -> Self {
        Self {
            variables,
            fragment_definitions,
            query_depth_limit,
        }
    }

    /// Validations performed:
    /// - Every referenced fragment exists and no fragment (transitively) spreads itself
    /// - Every variable used in an argument is declared by the operation
    /// - Fields with the same response key select the same field with the same arguments
    /// - The selection is no deeper than the configured limit
    pub(super) fn validate(
        &self,
        selection_set: &Positioned<SelectionSet>,
    ) -> Result<Vec<ValidatedField>, ValidationError> {
        self.validate_selection_set(selection_set, 1, &mut vec![])
    }

    fn validate_selection_set(
        &self,
        selection_set: &Positioned<SelectionSet>,
        depth: usize,
        fragment_path: &mut Vec<Name>,
    ) -> Result<Vec<ValidatedField>, ValidationError> {
        if depth > self.query_depth_limit {
            return Err(ValidationError::SelectionSetTooDeep(selection_set.pos));
        }

        let mut fields = vec![];
        self.collect_fields(selection_set, depth, fragment_path, &mut fields)?;
        merge_fields(fields)
    }

    fn collect_fields(
        &self,
        selection_set: &Positioned<SelectionSet>,
        depth: usize,
        fragment_path: &mut Vec<Name>,
        fields: &mut Vec<ValidatedField>,
    ) -> Result<(), ValidationError> {
        for selection in &selection_set.node.items {
            match &selection.node {
                Selection::Field(field) => {
                    if self.included(&field.node.directives)? {
                        fields.push(self.validate_field(field, depth, fragment_path)?);
                    }
                }
                Selection::FragmentSpread(fragment_spread) => {
                    if !self.included(&fragment_spread.node.directives)? {
                        continue;
                    }

                    let fragment_name = &fragment_spread.node.fragment_name;

                    if fragment_path.contains(&fragment_name.node) {
                        return Err(ValidationError::FragmentCycle(
                            fragment_name.node.to_string(),
                            fragment_name.pos,
                        ));
                    }

                    let fragment_definition = self
                        .fragment_definitions
                        .get(&fragment_name.node)
                        .ok_or_else(|| {
                            ValidationError::FragmentDefinitionNotFound(
                                fragment_name.node.to_string(),
                                fragment_name.pos,
                            )
                        })?;

                    fragment_path.push(fragment_name.node.clone());
                    self.collect_fields(
                        &fragment_definition.node.selection_set,
                        depth,
                        fragment_path,
                        fields,
                    )?;
                    fragment_path.pop();
                }
                Selection::InlineFragment(inline_fragment) => {
                    if self.included(&inline_fragment.node.directives)? {
                        self.collect_fields(
                            &inline_fragment.node.selection_set,
                            depth,
                            fragment_path,
                            fields,
                        )?;
                    }
                }
            }
        }

        Ok(())
    }

    fn validate_field(
        &self,
        field: &Positioned<Field>,
        depth: usize,
        fragment_path: &mut Vec<Name>,
    ) -> Result<ValidatedField, ValidationError> {
        let arguments = field
            .node
            .arguments
            .iter()
            .filter(|(_, value)| !self.is_unset_variable(&value.node))
            .map(|(name, value)| {
                Ok((
                    name.node.to_string(),
                    self.resolve_value(&value.node, value.pos)?,
                ))
            })
            .collect::<Result<IndexMap<_, _>, ValidationError>>()?;

        let subfields = if field.node.selection_set.node.items.is_empty() {
            vec![]
        } else {
            self.validate_selection_set(&field.node.selection_set, depth + 1, fragment_path)?
        };

        Ok(ValidatedField {
            alias: field.node.alias.as_ref().map(|alias| alias.node.clone()),
            name: field.node.name.node.clone(),
            arguments,
            subfields,
            pos: field.pos,
        })
    }

    /// A bare reference to a declared variable that has neither a supplied value nor a default.
    /// The argument it is passed to is treated as omitted, so the argument's own default applies.
    fn is_unset_variable(&self, value: &Value) -> bool {
        match value {
            Value::Variable(name) => matches!(self.variables.get(name), Some(None)),
            _ => false,
        }
    }

    /// Substitute variables. Unset variables nested in lists or objects become `null`.
    fn resolve_value(&self, value: &Value, pos: Pos) -> Result<ConstValue, ValidationError> {
        value.clone().into_const_with(|name| match self.variables.get(&name) {
            Some(value) => Ok(value.clone().unwrap_or(ConstValue::Null)),
            None => Err(ValidationError::VariableNotFound(name.to_string(), pos)),
        })
    }

    /// Evaluate `@skip(if:)` and `@include(if:)`. Other directives are ignored.
    fn included(&self, directives: &[Positioned<Directive>]) -> Result<bool, ValidationError> {
        for directive in directives {
            let directive_name = directive.node.name.node.as_str();

            let expected = match directive_name {
                "skip" => false,
                "include" => true,
                _ => continue,
            };

            let condition = directive
                .node
                .arguments
                .iter()
                .find(|(name, _)| name.node.as_str() == "if")
                .map(|(_, value)| self.resolve_value(&value.node, value.pos))
                .transpose()?;

            match condition {
                Some(ConstValue::Boolean(condition)) => {
                    if condition != expected {
                        return Ok(false);
                    }
                }
                _ => {
                    return Err(ValidationError::InvalidDirectiveArgument(
                        directive_name.to_string(),
                        directive.pos,
                    ));
                }
            }
        }

        Ok(true)
    }
}

/// Merge fields with the same response key, keeping the position of the first occurrence.
fn merge_fields(fields: Vec<ValidatedField>) -> Result<Vec<ValidatedField>, ValidationError> {
    let mut merged: IndexMap<String, ValidatedField> = IndexMap::new();

    for field in fields {
        let output_name = field.output_name();

        match merged.get_mut(&output_name) {
            Some(existing) => {
                if existing.name != field.name || existing.arguments != field.arguments {
                    return Err(ValidationError::MergeConflict(output_name, field.pos));
                }

                if !field.subfields.is_empty() {
                    let mut subfields = std::mem::take(&mut existing.subfields);
                    subfields.extend(field.subfields);
                    existing.subfields = merge_fields(subfields)?;
                }
            }
            None => {
                merged.insert(output_name, field);
            }
        }
    }

    Ok(merged.into_values().collect())
}
