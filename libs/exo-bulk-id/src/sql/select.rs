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
    ExpressionBuilder, SQLBuilder, physical_table::PhysicalTable, predicate::ConcretePredicate,
    select_values::SelectValues,
};

/// An inner join of a table to the table being selected from.
#[derive(Debug, PartialEq)]
pub struct InnerJoin<'a> {
    pub table: &'a PhysicalTable,
    pub predicate: ConcretePredicate,
}

impl ExpressionBuilder for InnerJoin<'_> {
    /// Build expression of the form `INNER JOIN <table> ON <predicate>`.
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("INNER JOIN ");
        self.table.build(builder);
        builder.push_str(" ON ");
        self.predicate.build(builder);
    }
}

/// A select statement
#[derive(Debug, PartialEq)]
pub struct Select<'a> {
    /// The columns to select
    pub values: SelectValues,
    /// The table to select from
    pub table: &'a PhysicalTable,
    /// Tables joined to `table`
    pub joins: Vec<InnerJoin<'a>>,
    /// The predicate to filter the rows
    pub predicate: MaybeOwned<'a, ConcretePredicate>,
}

impl ExpressionBuilder for Select<'_> {
    /// Build a select statement of the form `SELECT <values> FROM <table> [<joins>] WHERE
    /// <predicate>`. The `WHERE` is omitted if the predicate is `True`.
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("SELECT ");
        self.values.build(builder);

        builder.push_str(" FROM ");
        self.table.build(builder);

        for join in &self.joins {
            builder.push_space();
            join.build(builder);
        }

        // Avoid correct, but inelegant "WHERE TRUE" clause
        if self.predicate.as_ref() != &ConcretePredicate::True {
            builder.push_str(" WHERE ");
            self.predicate.build(builder);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Column, ParameterStyle, PhysicalTableName, Predicate};

    use super::*;

    #[test]
    fn select_with_join() {
        let orders = PhysicalTable::new(
            PhysicalTableName::new("orders", None),
            &["id"],
            &["status"],
        );
        let audits = PhysicalTable::new(
            PhysicalTableName::new("order_audits", None),
            &["order_id"],
            &["reviewed"],
        );

        let mut values = SelectValues::new();
        values.add_column(Some(&orders.name), "id", None);

        let select = Select {
            values,
            table: &orders,
            joins: vec![InnerJoin {
                table: &audits,
                predicate: Predicate::Eq(audits.column("order_id"), orders.column("id")),
            }],
            predicate: Predicate::Eq(audits.column("reviewed"), Column::param(false)).into(),
        };

        assert_binding!(
            select.to_sql(ParameterStyle::Numbered),
            r#"SELECT "orders"."id" FROM "orders" INNER JOIN "order_audits" ON "order_audits"."order_id" = "orders"."id" WHERE "order_audits"."reviewed" = $1"#,
            false
        );
    }

    #[test]
    fn select_without_predicate() {
        let orders = PhysicalTable::new(PhysicalTableName::new("orders", None), &["id"], &[]);

        let select = Select {
            values: SelectValues::new(),
            table: &orders,
            joins: vec![],
            predicate: Predicate::True.into(),
        };

        assert_binding!(
            select.to_sql(ParameterStyle::Numbered),
            r#"SELECT * FROM "orders""#
        );
    }
}
