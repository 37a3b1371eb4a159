// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use crate::SQLParam;

use super::{ExpressionBuilder, physical_table::PhysicalTableName};

/// How parameter placeholders are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterStyle {
    /// Postgres style: `$1`, `$2`, ...
    #[default]
    Numbered,
    /// Anonymous `?` placeholders, bound in order
    QuestionMark,
}

/// Accumulates the text of a statement along with the values bound to its placeholders.
pub struct SQLBuilder {
    sql: String,
    /// Bound in placeholder order
    params: Vec<Arc<dyn SQLParam>>,
    parameter_style: ParameterStyle,
    /// Render columns as `"table"."col"` rather than `"col"`. Off only inside
    /// [`SQLBuilder::without_fully_qualified_column_names`] (the SET list of an UPDATE).
    qualify_columns: bool,
}

impl SQLBuilder {
    pub fn new() -> Self {
        Self::with_parameter_style(ParameterStyle::default())
    }

    pub fn with_parameter_style(parameter_style: ParameterStyle) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            parameter_style,
            qualify_columns: true,
        }
    }

    pub fn push_str<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push_str(s.as_ref());
    }

    pub fn push(&mut self, c: char) {
        self.sql.push(c);
    }

    /// Push a double-quoted identifier, so that its case is preserved.
    pub fn push_identifier<T: AsRef<str>>(&mut self, s: T) {
        self.sql.push('"');
        self.sql.push_str(s.as_ref());
        self.sql.push('"');
    }

    /// Push a table name, prefixed with its schema if it has one (`"schema"."table"`).
    pub fn push_table(&mut self, table_name: &PhysicalTableName) {
        if let Some(schema) = &table_name.schema {
            self.push_identifier(schema);
            self.push('.');
        }
        self.push_identifier(&table_name.name);
    }

    /// Push `"table"."column"`, or only `"column"` within
    /// [`SQLBuilder::without_fully_qualified_column_names`].
    pub fn push_column(&mut self, table_name: &PhysicalTableName, column_name: &str) {
        if self.qualify_columns {
            self.push_table(table_name);
            self.push('.');
        }
        self.push_identifier(column_name);
    }

    pub fn push_space(&mut self) {
        self.sql.push(' ');
    }

    /// Bind a value and push its placeholder (`$<n>` or `?` depending on the style).
    pub fn push_param(&mut self, param: Arc<dyn SQLParam>) {
        self.params.push(param);
        match self.parameter_style {
            ParameterStyle::Numbered => {
                self.push('$');
                self.push_str(self.params.len().to_string());
            }
            ParameterStyle::QuestionMark => self.push('?'),
        }
    }

    /// Push each element with `push_elem`, separating them with `sep`.
    pub fn push_iter<T>(
        &mut self,
        iter: impl Iterator<Item = T>,
        sep: &str,
        push_elem: impl Fn(&mut Self, T),
    ) {
        for (index, item) in iter.enumerate() {
            if index > 0 {
                self.sql.push_str(sep);
            }
            push_elem(self, item);
        }
    }

    /// Build each element, separating them with `sep`.
    pub fn push_elems<T: ExpressionBuilder>(&mut self, elems: &[T], sep: &str) {
        self.push_iter(elems.iter(), sep, |builder, elem| {
            elem.build(builder);
        });
    }

    /// The finished statement and its parameters.
    pub fn into_sql(self) -> (String, Vec<Arc<dyn SQLParam>>) {
        (self.sql, self.params)
    }

    /// Run `func` with columns rendered unqualified, then restore the previous mode.
    pub fn without_fully_qualified_column_names<R>(&mut self, func: impl FnOnce(&mut Self) -> R) -> R {
        let qualify_columns = std::mem::replace(&mut self.qualify_columns, false);
        let result = func(self);
        self.qualify_columns = qualify_columns;
        result
    }
}

impl Default for SQLBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_placeholders() {
        let mut builder = SQLBuilder::new();
        builder.push_param(Arc::new(1));
        builder.push_str(", ");
        builder.push_param(Arc::new("x".to_string()));

        assert_binding!(builder.into_sql(), "$1, $2", 1, "x".to_string());
    }

    #[test]
    fn question_mark_placeholders() {
        let mut builder = SQLBuilder::with_parameter_style(ParameterStyle::QuestionMark);
        builder.push_param(Arc::new(1));
        builder.push_str(", ");
        builder.push_param(Arc::new(2));

        assert_binding!(builder.into_sql(), "?, ?", 1, 2);
    }

    #[test]
    fn qualified_columns() {
        let table = PhysicalTableName::new("orders", Some("sales"));

        let mut builder = SQLBuilder::new();
        builder.push_column(&table, "id");
        builder.push_space();
        builder.without_fully_qualified_column_names(|builder| builder.push_column(&table, "id"));

        assert_binding!(builder.into_sql(), r#""sales"."orders"."id" "id""#);
    }
}
