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
    ExpressionBuilder, SQLBuilder, column::Column, physical_table::PhysicalTable,
    predicate::ConcretePredicate,
};

/// An update operation.
#[derive(Debug, PartialEq)]
pub struct Update<'a> {
    /// The table to update.
    pub table: &'a PhysicalTable,
    /// The columns to update and their values.
    pub column_values: Vec<(&'a str, MaybeOwned<'a, Column>)>,
    /// The predicate to filter rows to update.
    pub predicate: ConcretePredicate,
}

impl ExpressionBuilder for Update<'_> {
    /// Build the update statement for the form `UPDATE <table> SET <column = value, ...> WHERE
    /// <predicate>`. The `WHERE` is omitted if the predicate is `True`.
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("UPDATE ");
        self.table.build(builder);

        builder.push_str(" SET ");
        builder.push_iter(
            self.column_values.iter(),
            ", ",
            |builder, (column_name, value)| {
                builder.without_fully_qualified_column_names(|builder| {
                    builder.push_column(&self.table.name, column_name);
                });

                builder.push_str(" = ");

                value.build(builder);
            },
        );

        if self.predicate != ConcretePredicate::True {
            builder.push_str(" WHERE ");
            self.predicate.build(builder);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{ParameterStyle, PhysicalTableName, Predicate};

    use super::*;

    #[test]
    fn update_scoped_by_subselect() {
        let orders = PhysicalTable::new(
            PhysicalTableName::new("orders", None),
            &["id"],
            &["status", "note"],
        );
        let status = Column::param("closed".to_string());

        let update = orders.update(
            vec![
                ("status", MaybeOwned::Borrowed(&status)),
                ("note", MaybeOwned::Owned(Column::Null)),
            ],
            Predicate::In(
                orders.column("id"),
                Column::SubSelect("select ID from HT_IDS where ENTITY_NAME='Order'".to_string()),
            ),
        );

        assert_binding!(
            update.to_sql(ParameterStyle::QuestionMark),
            r#"UPDATE "orders" SET "status" = ?, "note" = NULL WHERE "orders"."id" IN (select ID from HT_IDS where ENTITY_NAME='Order')"#,
            "closed".to_string()
        );
    }
}
