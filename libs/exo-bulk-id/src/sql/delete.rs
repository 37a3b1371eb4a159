// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{
    ExpressionBuilder, SQLBuilder, physical_table::PhysicalTable, predicate::ConcretePredicate,
};

/// A delete operation.
#[derive(Debug, PartialEq)]
pub struct Delete<'a> {
    /// The table to delete from.
    pub table: &'a PhysicalTable,
    /// The predicate to filter rows by.
    pub predicate: ConcretePredicate,
}

impl ExpressionBuilder for Delete<'_> {
    /// Build a delete operation for the `DELETE FROM <table> WHERE <predicate>`.
    /// The `WHERE` clause is omitted if the predicate is `true`.
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("DELETE FROM ");
        self.table.build(builder);

        if self.predicate != ConcretePredicate::True {
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
    fn delete_scoped_by_subselect() {
        let lines = PhysicalTable::new(
            PhysicalTableName::new("order_lines", Some("sales")),
            &["order_id"],
            &[],
        );

        let delete = lines.delete(Predicate::In(
            lines.column("order_id"),
            Column::SubSelect("select ID from HT_IDS where ENTITY_NAME='Order'".to_string()),
        ));

        assert_binding!(
            delete.to_sql(ParameterStyle::Numbered),
            r#"DELETE FROM "sales"."order_lines" WHERE "sales"."order_lines"."order_id" IN (select ID from HT_IDS where ENTITY_NAME='Order')"#
        );
    }

    #[test]
    fn delete_all() {
        let lines = PhysicalTable::new(PhysicalTableName::new("order_lines", None), &["id"], &[]);

        assert_binding!(
            lines.delete(Predicate::True).to_sql(ParameterStyle::Numbered),
            r#"DELETE FROM "order_lines""#
        );
    }
}
