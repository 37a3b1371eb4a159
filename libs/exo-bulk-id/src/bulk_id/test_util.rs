// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    EntityMapping, ParameterStyle, PhysicalTable, PhysicalTableName, SQLParam,
    database_error::DatabaseError, executor::StatementExecutor,
};

pub(crate) struct RecordedStatement {
    pub sql: String,
    pub params: Vec<Arc<dyn SQLParam>>,
}

/// Records the statements it is asked to execute instead of running them.
pub(crate) struct RecordingExecutor {
    pub statements: Vec<RecordedStatement>,
    parameter_style: ParameterStyle,
    failing_prefixes: Vec<String>,
}

impl RecordingExecutor {
    /// Rows reported as affected by every successful statement
    pub const AFFECTED_ROWS: u64 = 3;

    pub fn new() -> Self {
        Self {
            statements: vec![],
            parameter_style: ParameterStyle::QuestionMark,
            failing_prefixes: vec![],
        }
    }

    pub fn with_parameter_style(self, parameter_style: ParameterStyle) -> Self {
        Self {
            parameter_style,
            ..self
        }
    }

    /// Fail (after recording) any statement starting with `prefix`
    pub fn failing_on(mut self, prefix: &str) -> Self {
        self.failing_prefixes.push(prefix.to_string());
        self
    }

    pub fn sqls(&self) -> Vec<String> {
        self.statements.iter().map(|s| s.sql.clone()).collect()
    }
}

#[async_trait]
impl StatementExecutor for RecordingExecutor {
    fn parameter_style(&self) -> ParameterStyle {
        self.parameter_style
    }

    async fn execute(
        &mut self,
        sql: &str,
        params: &[Arc<dyn SQLParam>],
    ) -> Result<u64, DatabaseError> {
        self.statements.push(RecordedStatement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        if self
            .failing_prefixes
            .iter()
            .any(|prefix| sql.starts_with(prefix.as_str()))
        {
            Err(DatabaseError::BoxedError(
                format!("Simulated failure of: {sql}").into(),
            ))
        } else {
            Ok(Self::AFFECTED_ROWS)
        }
    }
}

/// An entity spread over the `orders` table and an `order_audits` secondary table.
pub(crate) fn order_entity() -> EntityMapping {
    EntityMapping::new(
        "Order",
        PhysicalTable::new(
            PhysicalTableName::new("orders", None),
            &["id"],
            &["status", "total", "note"],
        ),
    )
    .with_table(PhysicalTable::new(
        PhysicalTableName::new("order_audits", None),
        &["order_id"],
        &["reviewed", "reviewer"],
    ))
}

pub(crate) fn customer_entity() -> EntityMapping {
    EntityMapping::new(
        "Customer",
        PhysicalTable::new(
            PhysicalTableName::new("customers", None),
            &["id"],
            &["name"],
        ),
    )
}
