// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use maybe_owned::MaybeOwned;
use tracing::{debug, error, instrument};

use crate::{
    AbstractBulkDelete, AbstractBulkUpdate, EntityDescriptor, ExpressionBuilder,
    database_error::DatabaseError,
    executor::StatementExecutor,
    sql::{
        column::Column,
        delete::Delete,
        insert_select::InsertSelect,
        physical_table::PhysicalTable,
        predicate::{ConcretePredicate, Predicate},
        select::{InnerJoin, Select},
        select_values::SelectValues,
        update::Update,
    },
};

use super::IdTableHooks;

/// Bulk update that stages the ids of the matching rows and then updates each affected table
/// with a statement scoped to the staged ids.
pub struct TableBasedUpdateHandler<'a> {
    hooks: &'a dyn IdTableHooks,
    update: &'a AbstractBulkUpdate<'a>,
    tables: EntityTables<'a>,
}

/// Bulk delete that stages the ids of the matching rows and then deletes from each of the
/// entity's tables (dependent tables first) with a statement scoped to the staged ids.
pub struct TableBasedDeleteHandler<'a> {
    hooks: &'a dyn IdTableHooks,
    delete: &'a AbstractBulkDelete<'a>,
    tables: EntityTables<'a>,
}

impl<'a> TableBasedUpdateHandler<'a> {
    pub fn new(
        hooks: &'a dyn IdTableHooks,
        update: &'a AbstractBulkUpdate<'a>,
    ) -> Result<Self, DatabaseError> {
        let entity = update.entity;
        let tables = EntityTables::new(entity)?;
        validate_predicate(entity, &update.predicate)?;

        if update.assignments.is_empty() {
            return Err(DatabaseError::Validation(format!(
                "Bulk update of '{}' has no assignments",
                entity.entity_name()
            )));
        }

        for assignment in &update.assignments {
            let table = entity.table(&assignment.table_name).ok_or_else(|| {
                DatabaseError::Validation(format!(
                    "Table {} is not part of entity '{}'",
                    assignment.table_name.fully_qualified_name(),
                    entity.entity_name()
                ))
            })?;

            if !table.has_column(&assignment.column_name) {
                return Err(DatabaseError::Validation(format!(
                    "Column {} not found in table {}",
                    assignment.column_name,
                    table.name.fully_qualified_name()
                )));
            }
        }

        Ok(Self {
            hooks,
            update,
            tables,
        })
    }

    /// The statement that stages the ids of the rows to update.
    pub fn id_insert_select(&self) -> InsertSelect<'a> {
        id_insert_select(
            self.hooks,
            self.update.entity,
            &self.tables,
            &self.update.predicate,
        )
    }

    /// One update per table with assignments, in table order.
    pub fn update_statements(&self) -> Vec<Update<'a>> {
        let update = self.update;
        let id_subselect = self.hooks.generate_id_subselect(update.entity);

        self.tables
            .iter()
            .filter_map(|keyed_table| {
                let column_values: Vec<_> = update
                    .assignments
                    .iter()
                    .filter(|assignment| assignment.table_name == keyed_table.table.name)
                    .map(|assignment| {
                        (
                            assignment.column_name.as_str(),
                            MaybeOwned::Borrowed(&assignment.value),
                        )
                    })
                    .collect();

                (!column_values.is_empty()).then(|| {
                    keyed_table
                        .table
                        .update(column_values, keyed_table.scoped_to(&id_subselect))
                })
            })
            .collect()
    }

    /// Execute the bulk update and return the number of entities staged (and thus updated).
    #[instrument(
        name = "TableBasedUpdateHandler::execute"
        skip_all
        fields(entity = self.update.entity.entity_name())
        )]
    pub async fn execute(
        &self,
        executor: &mut dyn StatementExecutor,
    ) -> Result<u64, DatabaseError> {
        let outcome = self.execute_statements(executor).await;
        release_after(self.hooks, self.update.entity, executor, outcome).await
    }

    async fn execute_statements(
        &self,
        executor: &mut dyn StatementExecutor,
    ) -> Result<u64, DatabaseError> {
        let staged = run(executor, &self.id_insert_select()).await?;
        debug!(staged, "Staged ids for bulk update");

        for update in self.update_statements() {
            run(executor, &update).await?;
        }

        Ok(staged)
    }
}

impl<'a> TableBasedDeleteHandler<'a> {
    pub fn new(
        hooks: &'a dyn IdTableHooks,
        delete: &'a AbstractBulkDelete<'a>,
    ) -> Result<Self, DatabaseError> {
        let tables = EntityTables::new(delete.entity)?;
        validate_predicate(delete.entity, &delete.predicate)?;

        Ok(Self {
            hooks,
            delete,
            tables,
        })
    }

    /// The statement that stages the ids of the rows to delete.
    pub fn id_insert_select(&self) -> InsertSelect<'a> {
        id_insert_select(
            self.hooks,
            self.delete.entity,
            &self.tables,
            &self.delete.predicate,
        )
    }

    /// One delete per table, in reverse table order so that the root table goes last.
    pub fn delete_statements(&self) -> Vec<Delete<'a>> {
        let id_subselect = self.hooks.generate_id_subselect(self.delete.entity);

        self.tables
            .iter()
            .rev()
            .map(|keyed_table| keyed_table.table.delete(keyed_table.scoped_to(&id_subselect)))
            .collect()
    }

    /// Execute the bulk delete and return the number of entities staged (and thus deleted).
    #[instrument(
        name = "TableBasedDeleteHandler::execute"
        skip_all
        fields(entity = self.delete.entity.entity_name())
        )]
    pub async fn execute(
        &self,
        executor: &mut dyn StatementExecutor,
    ) -> Result<u64, DatabaseError> {
        let outcome = self.execute_statements(executor).await;
        release_after(self.hooks, self.delete.entity, executor, outcome).await
    }

    async fn execute_statements(
        &self,
        executor: &mut dyn StatementExecutor,
    ) -> Result<u64, DatabaseError> {
        let staged = run(executor, &self.id_insert_select()).await?;
        debug!(staged, "Staged ids for bulk delete");

        for delete in self.delete_statements() {
            run(executor, &delete).await?;
        }

        Ok(staged)
    }
}

/// A table of the entity along with the column holding the entity id.
struct KeyedTable<'a> {
    table: &'a PhysicalTable,
    key_column: &'a str,
}

impl KeyedTable<'_> {
    fn key(&self) -> Column {
        self.table.column(self.key_column)
    }

    /// `<table>.<key> IN (<id subselect>)`
    fn scoped_to(&self, id_subselect: &str) -> ConcretePredicate {
        Predicate::In(self.key(), Column::SubSelect(id_subselect.to_string()))
    }
}

/// The entity's tables, root first.
struct EntityTables<'a> {
    root: KeyedTable<'a>,
    others: Vec<KeyedTable<'a>>,
}

impl<'a> EntityTables<'a> {
    /// Only single-column ids fit in the id table, so every table must be keyed by exactly one
    /// column.
    fn new(entity: &'a dyn EntityDescriptor) -> Result<Self, DatabaseError> {
        let root = entity.root_table();

        Ok(Self {
            root: keyed_table(entity, root)?,
            others: entity
                .tables()
                .iter()
                .filter(|table| table.name != root.name)
                .map(|table| keyed_table(entity, table))
                .collect::<Result<_, _>>()?,
        })
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &KeyedTable<'a>> {
        std::iter::once(&self.root).chain(self.others.iter())
    }
}

fn keyed_table<'a>(
    entity: &dyn EntityDescriptor,
    table: &'a PhysicalTable,
) -> Result<KeyedTable<'a>, DatabaseError> {
    table
        .single_key_column()
        .map(|key_column| KeyedTable { table, key_column })
        .ok_or_else(|| {
            DatabaseError::Validation(format!(
                "Table {} of entity '{}' must be keyed by a single column to stage its ids (found {} key columns)",
                table.name.fully_qualified_name(),
                entity.entity_name(),
                table.key_columns.len()
            ))
        })
}

fn validate_predicate(
    entity: &dyn EntityDescriptor,
    predicate: &ConcretePredicate,
) -> Result<(), DatabaseError> {
    match predicate
        .referenced_tables()
        .into_iter()
        .find(|table_name| entity.table(table_name).is_none())
    {
        Some(table_name) => Err(DatabaseError::Validation(format!(
            "Predicate refers to table {}, which is not part of entity '{}'",
            table_name.fully_qualified_name(),
            entity.entity_name()
        ))),
        None => Ok(()),
    }
}

/// Build `INSERT INTO <id table> SELECT <root id>, <extra values> FROM <root> [INNER JOIN
/// ...] WHERE <predicate>`. Other tables of the entity are joined only if the predicate
/// refers to them.
fn id_insert_select<'a>(
    hooks: &dyn IdTableHooks,
    entity: &dyn EntityDescriptor,
    tables: &EntityTables<'a>,
    predicate: &'a ConcretePredicate,
) -> InsertSelect<'a> {
    let root = &tables.root;

    let mut values = SelectValues::new();
    values.add_column(Some(&root.table.name), root.key_column, None);
    hooks.add_extra_id_select_values(entity, &mut values);

    let referenced_tables = predicate.referenced_tables();
    let joins = tables
        .others
        .iter()
        .filter(|keyed_table| referenced_tables.contains(&&keyed_table.table.name))
        .map(|keyed_table| InnerJoin {
            table: keyed_table.table,
            predicate: Predicate::Eq(keyed_table.key(), root.key()),
        })
        .collect();

    InsertSelect {
        table_name: hooks.determine_id_table_name(entity),
        select: Select {
            values,
            table: root.table,
            joins,
            predicate: MaybeOwned::Borrowed(predicate),
        },
    }
}

async fn run(
    executor: &mut dyn StatementExecutor,
    statement: &impl ExpressionBuilder,
) -> Result<u64, DatabaseError> {
    let (sql, params) = statement.to_sql(executor.parameter_style());
    executor.execute(&sql, &params).await
}

/// Let the hooks release the staged ids. This happens even if the bulk statements failed, in
/// which case their error takes precedence over any error from releasing.
async fn release_after(
    hooks: &dyn IdTableHooks,
    entity: &dyn EntityDescriptor,
    executor: &mut dyn StatementExecutor,
    outcome: Result<u64, DatabaseError>,
) -> Result<u64, DatabaseError> {
    let released = hooks.release_from_use(entity, executor).await;

    match (outcome, released) {
        (Ok(staged), Ok(())) => Ok(staged),
        (Ok(_), Err(release_error)) => Err(release_error),
        (Err(error), Ok(())) => Err(error),
        (Err(error), Err(release_error)) => {
            error!(
                "Releasing staged ids of '{}' failed after an earlier error: {release_error}",
                entity.entity_name()
            );
            Err(error)
        }
    }
}
