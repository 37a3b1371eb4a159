// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, column::Column, physical_table::PhysicalTableName};

/// One entry of a select list: `<expression> [AS <alias>]`.
#[derive(Debug, PartialEq, Clone)]
pub struct SelectValue {
    pub expression: Column,
    /// Rendered verbatim (aliases here name columns of tables we don't manage, so we keep the
    /// caller's spelling)
    pub alias: Option<String>,
}

/// The select list of a `SELECT` statement, built up incrementally.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct SelectValues {
    values: Vec<SelectValue>,
}

impl SelectValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column. With a qualifier, `expression` is a column name of that table; without
    /// one, it is an SQL fragment (for example a quoted literal) that is used as is.
    pub fn add_column(
        &mut self,
        qualifier: Option<&PhysicalTableName>,
        expression: &str,
        alias: Option<&str>,
    ) -> &mut Self {
        let expression = match qualifier {
            Some(table_name) => Column::physical(table_name, expression),
            None => Column::Formula(expression.to_string()),
        };

        self.values.push(SelectValue {
            expression,
            alias: alias.map(|a| a.to_string()),
        });
        self
    }

    pub fn values(&self) -> &[SelectValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ExpressionBuilder for SelectValue {
    fn build(&self, builder: &mut SQLBuilder) {
        self.expression.build(builder);

        if let Some(alias) = &self.alias {
            builder.push_str(" AS ");
            builder.push_str(alias);
        }
    }
}

impl ExpressionBuilder for SelectValues {
    /// Build the comma-separated select list. An empty list renders as `*`.
    fn build(&self, builder: &mut SQLBuilder) {
        if self.values.is_empty() {
            builder.push('*');
        } else {
            builder.push_elems(&self.values, ", ");
        }
    }
}
