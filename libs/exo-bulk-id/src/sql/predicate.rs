// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, column::Column, physical_table::PhysicalTableName};

pub type ConcretePredicate = Predicate;

/// A predicate (the `WHERE` clause of a statement or the `ON` clause of a join).
#[derive(Debug, PartialEq, Clone)]
pub enum Predicate {
    True,
    False,
    Eq(Column, Column),
    Neq(Column, Column),
    Lt(Column, Column),
    Lte(Column, Column),
    Gt(Column, Column),
    Gte(Column, Column),
    In(Column, Column),
    // Prefer Predicate::and(), which simplifies the clause, to construct an And expression
    And(Box<Predicate>, Box<Predicate>),
    // Prefer Predicate::or(), which simplifies the clause, to construct an Or expression
    Or(Box<Predicate>, Box<Predicate>),
    // Prefer `!predicate`, which simplifies the clause, to construct a Not expression
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn eq(lhs: Column, rhs: Column) -> Predicate {
        if lhs == rhs {
            Predicate::True
        } else {
            Predicate::Eq(lhs, rhs)
        }
    }

    pub fn and(lhs: Predicate, rhs: Predicate) -> Predicate {
        match (lhs, rhs) {
            (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
            (Predicate::True, rhs) => rhs,
            (lhs, Predicate::True) => lhs,
            (lhs, rhs) => Predicate::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn or(lhs: Predicate, rhs: Predicate) -> Predicate {
        match (lhs, rhs) {
            (Predicate::True, _) | (_, Predicate::True) => Predicate::True,
            (Predicate::False, rhs) => rhs,
            (lhs, Predicate::False) => lhs,
            (lhs, rhs) => Predicate::Or(Box::new(lhs), Box::new(rhs)),
        }
    }

    /// Tables of all physical columns mentioned in this predicate (in order of first mention).
    pub fn referenced_tables(&self) -> Vec<&PhysicalTableName> {
        let mut tables = vec![];
        self.collect_tables(&mut tables);
        tables
    }

    fn collect_tables<'a>(&'a self, tables: &mut Vec<&'a PhysicalTableName>) {
        match self {
            Predicate::True | Predicate::False => {}
            Predicate::Eq(l, r)
            | Predicate::Neq(l, r)
            | Predicate::Lt(l, r)
            | Predicate::Lte(l, r)
            | Predicate::Gt(l, r)
            | Predicate::Gte(l, r)
            | Predicate::In(l, r) => {
                for table_name in [l, r].into_iter().filter_map(Column::table_name) {
                    if !tables.contains(&table_name) {
                        tables.push(table_name);
                    }
                }
            }
            Predicate::And(l, r) | Predicate::Or(l, r) => {
                l.collect_tables(tables);
                r.collect_tables(tables);
            }
            Predicate::Not(p) => p.collect_tables(tables),
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        match self {
            // Reduced to a simpler form when possible, else fall back to Predicate::Not
            Predicate::True => Predicate::False,
            Predicate::False => Predicate::True,
            Predicate::Eq(lhs, rhs) => Predicate::Neq(lhs, rhs),
            Predicate::Neq(lhs, rhs) => Predicate::Eq(lhs, rhs),
            Predicate::Lt(lhs, rhs) => Predicate::Gte(lhs, rhs),
            Predicate::Lte(lhs, rhs) => Predicate::Gt(lhs, rhs),
            Predicate::Gt(lhs, rhs) => Predicate::Lte(lhs, rhs),
            Predicate::Gte(lhs, rhs) => Predicate::Lt(lhs, rhs),
            predicate => Predicate::Not(Box::new(predicate)),
        }
    }
}

impl ExpressionBuilder for Predicate {
    /// Build a predicate into a SQL string.
    fn build(&self, builder: &mut SQLBuilder) {
        match &self {
            Predicate::True => builder.push_str("TRUE"),
            Predicate::False => builder.push_str("FALSE"),
            Predicate::Eq(column1, column2) => {
                if column2 == &Column::Null {
                    column1.build(builder);
                    builder.push_str(" IS NULL");
                } else {
                    relational_combine(column1, column2, "=", builder)
                }
            }
            Predicate::Neq(column1, column2) => {
                if column2 == &Column::Null {
                    column1.build(builder);
                    builder.push_str(" IS NOT NULL");
                } else {
                    relational_combine(column1, column2, "<>", builder)
                }
            }
            Predicate::Lt(column1, column2) => relational_combine(column1, column2, "<", builder),
            Predicate::Lte(column1, column2) => {
                relational_combine(column1, column2, "<=", builder)
            }
            Predicate::Gt(column1, column2) => relational_combine(column1, column2, ">", builder),
            Predicate::Gte(column1, column2) => {
                relational_combine(column1, column2, ">=", builder)
            }
            Predicate::In(column1, column2) => {
                relational_combine(column1, column2, "IN", builder)
            }
            Predicate::And(predicate1, predicate2) => {
                logical_combine(predicate1, predicate2, "AND", builder)
            }
            Predicate::Or(predicate1, predicate2) => {
                logical_combine(predicate1, predicate2, "OR", builder)
            }
            Predicate::Not(predicate) => {
                builder.push_str("NOT(");
                predicate.build(builder);
                builder.push(')');
            }
        }
    }
}

/// Combine two expressions with a relational operator.
fn relational_combine<E1: ExpressionBuilder, E2: ExpressionBuilder>(
    left: &E1,
    right: &E2,
    op: &'static str,
    builder: &mut SQLBuilder,
) {
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
}

/// Combine two expressions with a logical binary operator.
fn logical_combine<E1: ExpressionBuilder, E2: ExpressionBuilder>(
    left: &E1,
    right: &E2,
    op: &'static str,
    builder: &mut SQLBuilder,
) {
    builder.push('(');
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
    builder.push(')');
}

#[cfg(test)]
mod tests {
    use crate::ParameterStyle;

    use super::*;

    fn orders() -> PhysicalTableName {
        PhysicalTableName::new("orders", None)
    }

    #[test]
    fn and_or_simplification() {
        let status = Predicate::Eq(
            Column::physical(&orders(), "status"),
            Column::param("open".to_string()),
        );

        assert_eq!(Predicate::and(Predicate::True, status.clone()), status);
        assert_eq!(
            Predicate::and(status.clone(), Predicate::False),
            Predicate::False
        );
        assert_eq!(Predicate::or(status.clone(), Predicate::True), Predicate::True);
        assert_eq!(Predicate::or(Predicate::False, status.clone()), status);
        assert_eq!(
            Predicate::eq(
                Column::physical(&orders(), "id"),
                Column::physical(&orders(), "id")
            ),
            Predicate::True
        );
    }

    #[test]
    fn negation() {
        let lt = Predicate::Lt(
            Column::physical(&orders(), "total"),
            Column::param(100),
        );

        assert!(matches!(!lt, Predicate::Gte(_, _)));
        assert!(matches!(!Predicate::True, Predicate::False));
    }

    #[test]
    fn compound_predicate() {
        let predicate = Predicate::and(
            Predicate::Eq(
                Column::physical(&orders(), "status"),
                Column::param("open".to_string()),
            ),
            Predicate::or(
                Predicate::Gt(Column::physical(&orders(), "total"), Column::param(100)),
                Predicate::Eq(Column::physical(&orders(), "note"), Column::Null),
            ),
        );

        assert_binding!(
            predicate.to_sql(ParameterStyle::Numbered),
            r#"("orders"."status" = $1 AND ("orders"."total" > $2 OR "orders"."note" IS NULL))"#,
            "open".to_string(),
            100
        );
    }

    #[test]
    fn referenced_tables_are_deduplicated() {
        let audits = PhysicalTableName::new("order_audits", None);
        let predicate = Predicate::and(
            Predicate::Eq(
                Column::physical(&orders(), "status"),
                Column::physical(&audits, "status"),
            ),
            !Predicate::Eq(Column::physical(&orders(), "note"), Column::Null),
        );

        assert_eq!(predicate.referenced_tables(), vec![&orders(), &audits]);
    }
}
