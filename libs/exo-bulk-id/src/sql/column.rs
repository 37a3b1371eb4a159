// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::SQLParam;

use super::{ExpressionBuilder, SQLBuilder, SQLParamContainer, physical_table::PhysicalTableName};

/// A column-like concept covering any usage where a database table column could be used. For
/// example, in a predicate you can say `status = 'shipped'` or `status = previous_status`. Here,
/// `status`, `previous_status`, and `'shipped'` all serve as columns from our perspective.
#[derive(Debug, PartialEq, Clone)]
pub enum Column {
    /// An actual physical column in a table
    Physical {
        table_name: PhysicalTableName,
        column_name: String,
    },
    /// A literal value such as a string or number. This will be mapped to a placeholder
    /// to avoid SQL injection.
    Param(SQLParamContainer),
    /// A constant string, rendered between single quotes. Unlike [`Column::Param`], the value
    /// is inlined and not escaped.
    Constant(String),
    /// An SQL fragment rendered verbatim, such as an expression supplied by a caller that has
    /// already rendered it.
    Formula(String),
    /// A sub-select given as SQL text (rendered in parentheses).
    SubSelect(String),
    /// A null value
    Null,
}

impl Column {
    pub fn physical(table_name: &PhysicalTableName, column_name: impl Into<String>) -> Self {
        Self::Physical {
            table_name: table_name.clone(),
            column_name: column_name.into(),
        }
    }

    pub fn param<T: SQLParam + 'static>(value: T) -> Self {
        Self::Param(SQLParamContainer::new(value))
    }

    /// The table this column belongs to, if it is a physical column.
    pub fn table_name(&self) -> Option<&PhysicalTableName> {
        match self {
            Column::Physical { table_name, .. } => Some(table_name),
            _ => None,
        }
    }
}

impl ExpressionBuilder for Column {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            Column::Physical {
                table_name,
                column_name,
            } => builder.push_column(table_name, column_name),
            Column::Param(value) => builder.push_param(value.param()),
            Column::Constant(value) => {
                builder.push('\'');
                builder.push_str(value);
                builder.push('\'');
            }
            Column::Formula(formula) => builder.push_str(formula),
            Column::SubSelect(subselect) => {
                builder.push('(');
                builder.push_str(subselect);
                builder.push(')');
            }
            Column::Null => builder.push_str("NULL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ParameterStyle;

    use super::*;

    #[test]
    fn physical_column() {
        let column = Column::physical(&PhysicalTableName::new("orders", None), "status");

        assert_binding!(
            column.to_sql(ParameterStyle::Numbered),
            r#""orders"."status""#
        );
    }

    #[test]
    fn param_column() {
        let column = Column::param("shipped".to_string());

        assert_binding!(
            column.to_sql(ParameterStyle::Numbered),
            "$1",
            "shipped".to_string()
        );
    }

    #[test]
    fn constant_is_inlined_without_escaping() {
        let column = Column::Constant("O'Brien".to_string());

        assert_binding!(column.to_sql(ParameterStyle::Numbered), "'O'Brien'");
    }

    #[test]
    fn subselect_column() {
        let column = Column::SubSelect("select ID from T".to_string());

        assert_binding!(
            column.to_sql(ParameterStyle::Numbered),
            "(select ID from T)"
        );
    }
}
