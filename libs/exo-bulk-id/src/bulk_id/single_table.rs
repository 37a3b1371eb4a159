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
use tracing::{error, instrument, trace};

use crate::{
    AbstractBulkDelete, AbstractBulkUpdate, EntityDescriptor, SQLBuilder, SelectValues,
    config::StagingTableConfig, database_error::DatabaseError, executor::StatementExecutor,
};

use super::{BulkIdStrategy, IdTableHooks, TableBasedDeleteHandler, TableBasedUpdateHandler};

/// Stages the ids of every entity in one shared, pre-existing table, tagging each row with
/// the entity's name.
///
/// Since the table is never created or dropped here, this works where DDL can't be issued at
/// runtime. Rows of concurrent bulk operations are told apart only by the entity name, so two
/// concurrent operations on the same entity must not target overlapping ids.
#[derive(Debug, Clone, Default)]
pub struct SingleTableBulkIdStrategy {
    config: StagingTableConfig,
}

impl SingleTableBulkIdStrategy {
    pub fn new(config: StagingTableConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StagingTableConfig {
        &self.config
    }

    /// The tag of the rows staged for `entity`. Staging, scoping and cleanup all use this value.
    pub fn generate_discriminator_value(&self, entity: &dyn EntityDescriptor) -> String {
        entity.entity_name().to_string()
    }

    /// `delete from <table> where <discriminator>=<param>`
    fn cleanup_statement(
        &self,
        entity: &dyn EntityDescriptor,
        executor: &dyn StatementExecutor,
    ) -> SQLBuilder {
        let mut builder = SQLBuilder::with_parameter_style(executor.parameter_style());
        builder.push_str("delete from ");
        builder.push_str(self.config.table_name());
        builder.push_str(" where ");
        builder.push_str(self.config.discriminator_column());
        builder.push('=');
        builder.push_param(Arc::new(self.generate_discriminator_value(entity)));
        builder
    }
}

#[async_trait]
impl IdTableHooks for SingleTableBulkIdStrategy {
    fn determine_id_table_name(&self, _entity: &dyn EntityDescriptor) -> String {
        self.config.table_name().to_string()
    }

    /// The discriminator value is embedded as a literal without escaping. Entity names come from
    /// mapping metadata and are expected to be free of quotes.
    fn generate_id_subselect(&self, entity: &dyn EntityDescriptor) -> String {
        format!(
            "select {} from {} where {}='{}'",
            self.config.id_column(),
            self.config.table_name(),
            self.config.discriminator_column(),
            self.generate_discriminator_value(entity)
        )
    }

    fn add_extra_id_select_values(
        &self,
        entity: &dyn EntityDescriptor,
        select_values: &mut SelectValues,
    ) {
        select_values.add_column(
            None,
            &format!("'{}'", self.generate_discriminator_value(entity)),
            Some(self.config.discriminator_column()),
        );
    }

    #[instrument(
        name = "SingleTableBulkIdStrategy::release_from_use"
        skip_all
        fields(entity = entity.entity_name())
        )]
    async fn release_from_use(
        &self,
        entity: &dyn EntityDescriptor,
        executor: &mut dyn StatementExecutor,
    ) -> Result<(), DatabaseError> {
        if !self.config.clean_rows() {
            trace!(
                "Leaving ids staged for '{}' in {}",
                entity.entity_name(),
                self.config.table_name()
            );
            return Ok(());
        }

        let (sql, params) = self.cleanup_statement(entity, executor).into_sql();

        match executor.execute(&sql, &params).await {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Unable to clean up id table {}: {e}", self.config.table_name());
                Err(DatabaseError::StagingCleanup {
                    table: self.config.table_name().to_string(),
                    sql,
                    source: Box::new(e),
                })
            }
        }
    }
}

#[async_trait]
impl BulkIdStrategy for SingleTableBulkIdStrategy {
    async fn prepare(&self, _executor: &mut dyn StatementExecutor) -> Result<(), DatabaseError> {
        // The staging table must already exist
        trace!("Using id table {}", self.config.table_name());
        Ok(())
    }

    async fn release(&self, _executor: &mut dyn StatementExecutor) -> Result<(), DatabaseError> {
        trace!("Done with id table {}", self.config.table_name());
        Ok(())
    }

    fn build_update_handler<'a>(
        &'a self,
        update: &'a AbstractBulkUpdate<'a>,
    ) -> Result<TableBasedUpdateHandler<'a>, DatabaseError> {
        TableBasedUpdateHandler::new(self, update)
    }

    fn build_delete_handler<'a>(
        &'a self,
        delete: &'a AbstractBulkDelete<'a>,
    ) -> Result<TableBasedDeleteHandler<'a>, DatabaseError> {
        TableBasedDeleteHandler::new(self, delete)
    }
}
