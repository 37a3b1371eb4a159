// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use async_trait::async_trait;

use crate::{
    AbstractBulkDelete, AbstractBulkUpdate, EntityDescriptor, SelectValues,
    database_error::DatabaseError, executor::StatementExecutor,
};

mod handler;
mod single_table;

#[cfg(test)]
mod test_util;

pub use handler::{TableBasedDeleteHandler, TableBasedUpdateHandler};
pub use single_table::SingleTableBulkIdStrategy;

/// The decisions a table-based handler delegates: where the ids of the targeted rows are
/// staged, how the per-table statements find them, and what happens to them afterwards.
#[async_trait]
pub trait IdTableHooks: Send + Sync {
    /// The table the ids for `entity` are inserted into.
    fn determine_id_table_name(&self, entity: &dyn EntityDescriptor) -> String;

    /// A subselect returning exactly the ids staged for `entity`.
    fn generate_id_subselect(&self, entity: &dyn EntityDescriptor) -> String;

    /// Add any columns beyond the id to the select list that populates the id table.
    fn add_extra_id_select_values(
        &self,
        entity: &dyn EntityDescriptor,
        select_values: &mut SelectValues,
    );

    /// Called once the bulk operation's statements have run (whether or not they succeeded).
    async fn release_from_use(
        &self,
        entity: &dyn EntityDescriptor,
        executor: &mut dyn StatementExecutor,
    ) -> Result<(), DatabaseError>;
}

/// A strategy for bulk operations on entities spanning multiple tables.
#[async_trait]
pub trait BulkIdStrategy: Send + Sync {
    /// Called once when the strategy is put into service.
    async fn prepare(&self, executor: &mut dyn StatementExecutor) -> Result<(), DatabaseError>;

    /// Called once when the strategy is taken out of service.
    async fn release(&self, executor: &mut dyn StatementExecutor) -> Result<(), DatabaseError>;

    fn build_update_handler<'a>(
        &'a self,
        update: &'a AbstractBulkUpdate<'a>,
    ) -> Result<TableBasedUpdateHandler<'a>, DatabaseError>;

    fn build_delete_handler<'a>(
        &'a self,
        delete: &'a AbstractBulkDelete<'a>,
    ) -> Result<TableBasedDeleteHandler<'a>, DatabaseError>;
}
