// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::sql::{column::Column, physical_table::PhysicalTableName, predicate::ConcretePredicate};

use super::entity::EntityDescriptor;

/// `SET <column> = <value>` for one column of one of the entity's tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub table_name: PhysicalTableName,
    pub column_name: String,
    pub value: Column,
}

impl Assignment {
    pub fn new(table_name: &PhysicalTableName, column_name: impl Into<String>, value: Column) -> Self {
        Self {
            table_name: table_name.clone(),
            column_name: column_name.into(),
            value,
        }
    }
}

/// Intention to update all instances of an entity matching a predicate.
///
/// The predicate may refer to columns of any of the entity's tables. The assignments may
/// also target any of those tables; tables without assignments are left alone.
#[derive(Debug)]
pub struct AbstractBulkUpdate<'a> {
    pub entity: &'a dyn EntityDescriptor,
    pub assignments: Vec<Assignment>,
    pub predicate: ConcretePredicate,
}

/// Intention to delete all instances of an entity matching a predicate.
#[derive(Debug)]
pub struct AbstractBulkDelete<'a> {
    pub entity: &'a dyn EntityDescriptor,
    pub predicate: ConcretePredicate,
}
