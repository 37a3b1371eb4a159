// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{any::Any, fmt::Debug, sync::Arc};
use tokio_postgres::types::ToSql;

#[macro_use]
#[cfg(test)]
mod test_util;

pub(crate) mod column;
pub(crate) mod delete;
pub(crate) mod insert_select;
pub(crate) mod physical_table;
pub(crate) mod predicate;
pub(crate) mod select;
pub(crate) mod select_values;
pub(crate) mod update;

mod expression_builder;
mod sql_builder;

pub use expression_builder::ExpressionBuilder;
pub use sql_builder::{ParameterStyle, SQLBuilder};

/// A value that can be bound to a statement placeholder.
///
/// Implemented for every comparable `ToSql` type, so that bound values can be compared across
/// types (values of different types are never equal).
pub trait SQLParam: ToSql + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn same_value(&self, other: &dyn SQLParam) -> bool;

    /// The form `tokio_postgres` binds
    fn as_pg(&self) -> &(dyn ToSql + Sync);
}

impl<T: ToSql + Send + Sync + Any + PartialEq> SQLParam for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_value(&self, other: &dyn SQLParam) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_pg(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

impl PartialEq for dyn SQLParam {
    fn eq(&self, other: &Self) -> bool {
        self.same_value(other)
    }
}

/// A bound value held by a [`Column::Param`](column::Column::Param). Comparable and printable so
/// that statements can be compared in tests.
#[derive(Clone)]
pub struct SQLParamContainer(Arc<dyn SQLParam>);

impl SQLParamContainer {
    pub fn new<T: SQLParam + 'static>(param: T) -> Self {
        Self(Arc::new(param))
    }

    pub fn param(&self) -> Arc<dyn SQLParam> {
        self.0.clone()
    }
}

impl PartialEq for SQLParamContainer {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_ref() == other.0.as_ref()
    }
}

impl Debug for SQLParamContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
