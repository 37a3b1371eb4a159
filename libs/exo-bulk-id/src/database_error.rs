// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Delegate: {0}")]
    Delegate(#[from] tokio_postgres::Error),

    /// Removing the staged ids after a bulk operation failed. The bulk operation itself has
    /// already executed (within the caller's transaction).
    #[error("Unable to clean up id table [{table}]")]
    StagingCleanup {
        table: String,
        sql: String,
        #[source]
        source: Box<DatabaseError>,
    },

    #[error("{0} {1}")]
    WithContext(String, #[source] Box<DatabaseError>),

    /// Errors from other statement executors
    #[error("{0}")]
    BoxedError(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl DatabaseError {
    pub fn with_context(self, context: String) -> DatabaseError {
        DatabaseError::WithContext(context, Box::new(self))
    }
}

pub trait WithContext {
    fn with_context(self, context: String) -> Self;
}

impl<T> WithContext for Result<T, DatabaseError> {
    fn with_context(self, context: String) -> Result<T, DatabaseError> {
        self.map_err(|e| e.with_context(context))
    }
}
