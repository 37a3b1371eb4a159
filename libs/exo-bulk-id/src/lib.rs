// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Bulk UPDATE/DELETE support for entities whose rows span several physical tables.
//!
//! A bulk operation on such an entity cannot be expressed as a single statement: every
//! table holding a part of the entity needs its own UPDATE or DELETE, and all of them must
//! target the same set of rows. The approach taken here is to first stage the ids of the
//! affected rows in an id table and then scope each per-table statement with a subselect
//! over the staged ids.
//!
//! The [TableBasedUpdateHandler] and [TableBasedDeleteHandler] implement that protocol.
//! They don't decide where the ids go; instead they are given an [IdTableHooks]
//! implementation that names the id table, supplies the subselect, tags the staged rows,
//! and cleans up afterwards. [SingleTableBulkIdStrategy] is the implementation that uses
//! one pre-existing, shared staging table (by default `HT_GLOBAL_TEMP_TABLE_IDS`) whose
//! rows are discriminated by entity name. This is useful where DDL can't be issued at
//! runtime or where a table per entity isn't practical.
//!
//! Statements are executed through a [StatementExecutor], which is implemented for
//! `tokio_postgres` clients and transactions.

#[macro_use]
mod sql;
mod asql;
mod bulk_id;

pub mod config;
pub mod database_error;
pub mod executor;

/// Public types at the root level of this crate
pub use asql::{
    bulk::{AbstractBulkDelete, AbstractBulkUpdate, Assignment},
    entity::{EntityDescriptor, EntityMapping},
};

pub use bulk_id::{
    BulkIdStrategy, IdTableHooks, SingleTableBulkIdStrategy, TableBasedDeleteHandler,
    TableBasedUpdateHandler,
};

pub use sql::{
    ExpressionBuilder, ParameterStyle, SQLBuilder, SQLParam, SQLParamContainer,
    column::Column,
    delete::Delete,
    insert_select::InsertSelect,
    physical_table::{PhysicalTable, PhysicalTableName},
    predicate::Predicate,
    select::{InnerJoin, Select},
    select_values::{SelectValue, SelectValues},
    update::Update,
};

pub use config::StagingTableConfig;
pub use database_error::DatabaseError;
pub use executor::StatementExecutor;
