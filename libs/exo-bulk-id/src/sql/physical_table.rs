// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use maybe_owned::MaybeOwned;

use super::{
    ExpressionBuilder, SQLBuilder, column::Column, delete::Delete, predicate::ConcretePredicate,
    update::Update,
};

/// The name of a physical table, optionally qualified with a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhysicalTableName {
    pub name: String,
    pub schema: Option<String>,
}

impl PhysicalTableName {
    pub fn new(name: impl Into<String>, schema: Option<&str>) -> Self {
        Self {
            name: name.into(),
            schema: schema.map(|s| s.to_string()),
        }
    }

    /// `schema.name` if there is a schema, otherwise just the name (unquoted, for messages).
    pub fn fully_qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

impl ExpressionBuilder for PhysicalTableName {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_table(self);
    }
}

/// A physical table holding (a part of) an entity's data such as "orders" or "order_audits".
///
/// The key columns are the columns that hold the entity id in this table. For the root table
/// of an entity that is its primary key; for the other tables, it is the column referencing the
/// root table's primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalTable {
    pub name: PhysicalTableName,
    pub key_columns: Vec<String>,
    /// Non-key columns
    pub columns: Vec<String>,
}

impl PhysicalTable {
    pub fn new(name: PhysicalTableName, key_columns: &[&str], columns: &[&str]) -> Self {
        Self {
            name,
            key_columns: key_columns.iter().map(|c| c.to_string()).collect(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn has_column(&self, column_name: &str) -> bool {
        self.key_columns
            .iter()
            .chain(self.columns.iter())
            .any(|c| c == column_name)
    }

    /// The key column, if the key is made of exactly one column.
    pub fn single_key_column(&self) -> Option<&str> {
        match self.key_columns.as_slice() {
            [column] => Some(column.as_str()),
            _ => None,
        }
    }

    pub fn column(&self, column_name: &str) -> Column {
        Column::physical(&self.name, column_name)
    }

    pub fn delete(&self, predicate: ConcretePredicate) -> Delete<'_> {
        Delete {
            table: self,
            predicate,
        }
    }

    pub fn update<'a>(
        &'a self,
        column_values: Vec<(&'a str, MaybeOwned<'a, Column>)>,
        predicate: ConcretePredicate,
    ) -> Update<'a> {
        Update {
            table: self,
            column_values,
            predicate,
        }
    }
}

impl ExpressionBuilder for PhysicalTable {
    /// Build a table reference for the `<table>`.
    fn build(&self, builder: &mut SQLBuilder) {
        self.name.build(builder);
    }
}
