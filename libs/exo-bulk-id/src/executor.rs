// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_postgres::{Client, GenericClient, Transaction};
use tracing::{debug, error};

use crate::{ParameterStyle, SQLParam, database_error::DatabaseError};

/// Executes statements on behalf of a bulk operation.
///
/// All statements of one bulk operation (staging the ids, the per-table statements, and the
/// cleanup) go through the same executor, so they share its connection and transaction.
#[async_trait]
pub trait StatementExecutor: Send {
    /// The placeholder style statements must be rendered with for this executor.
    fn parameter_style(&self) -> ParameterStyle {
        ParameterStyle::Numbered
    }

    /// Execute a statement and return the number of rows it affected.
    async fn execute(
        &mut self,
        sql: &str,
        params: &[Arc<dyn SQLParam>],
    ) -> Result<u64, DatabaseError>;
}

#[async_trait]
impl StatementExecutor for Client {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[Arc<dyn SQLParam>],
    ) -> Result<u64, DatabaseError> {
        execute_prepared(self, sql, params).await
    }
}

#[async_trait]
impl StatementExecutor for Transaction<'_> {
    async fn execute(
        &mut self,
        sql: &str,
        params: &[Arc<dyn SQLParam>],
    ) -> Result<u64, DatabaseError> {
        execute_prepared(self, sql, params).await
    }
}

async fn execute_prepared<C: GenericClient + Sync>(
    client: &C,
    sql: &str,
    params: &[Arc<dyn SQLParam>],
) -> Result<u64, DatabaseError> {
    let params: Vec<_> = params.iter().map(|p| p.as_pg()).collect();

    debug!("Executing SQL statement: {}", sql);

    // The statement is closed when dropped, so it is released on every path out of here
    let statement = client.prepare(sql).await.map_err(|e| {
        error!("Failed to prepare statement: {e:?}");
        DatabaseError::Delegate(e).with_context(format!("Failed to prepare: {sql}"))
    })?;

    client.execute(&statement, &params[..]).await.map_err(|e| {
        error!("Failed to execute statement: {e:?}");
        DatabaseError::Delegate(e).with_context("Database operation failed".into())
    })
}
