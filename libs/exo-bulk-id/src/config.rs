// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::database_error::DatabaseError;

pub const DEFAULT_TABLE_NAME: &str = "HT_GLOBAL_TEMP_TABLE_IDS";
pub const DEFAULT_ID_COLUMN: &str = "ID";
pub const DEFAULT_DISCRIMINATOR_COLUMN: &str = "ENTITY_NAME";

const TABLE_NAME_PARAM: &str = "EXO_BULK_ID_TABLE";
const ID_COLUMN_PARAM: &str = "EXO_BULK_ID_COLUMN";
const DISCRIMINATOR_COLUMN_PARAM: &str = "EXO_BULK_ID_DISCRIMINATOR_COLUMN";
const CLEAN_ROWS_PARAM: &str = "EXO_BULK_ID_CLEAN_ROWS"; // boolean (default: false)

/// Where and how ids are staged by [`SingleTableBulkIdStrategy`](crate::SingleTableBulkIdStrategy).
///
/// The staging table must already exist, for example:
///
/// ```sql
/// CREATE TABLE HT_GLOBAL_TEMP_TABLE_IDS (ID CHAR(36), ENTITY_NAME VARCHAR(100))
/// ```
///
/// The id column must be wide enough for the id of every entity sharing the table, and the
/// column order must be (id, discriminator). Names are used verbatim in the generated SQL (the
/// table name may include a schema, e.g. `staging.HT_GLOBAL_TEMP_TABLE_IDS`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTableConfig {
    table_name: String,
    id_column: String,
    discriminator_column: String,
    /// Delete the staged rows of an entity once its bulk operation is done. Off by default, in
    /// which case rows accumulate and the table must be cleaned up externally.
    clean_rows: bool,
}

impl Default for StagingTableConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            discriminator_column: DEFAULT_DISCRIMINATOR_COLUMN.to_string(),
            clean_rows: false,
        }
    }
}

impl StagingTableConfig {
    pub fn new(
        table_name: impl Into<String>,
        id_column: impl Into<String>,
        discriminator_column: impl Into<String>,
        clean_rows: bool,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            id_column: id_column.into(),
            discriminator_column: discriminator_column.into(),
            clean_rows,
        }
    }

    /// Read the configuration using `lookup` to resolve the `EXO_BULK_ID_*` variables, falling
    /// back to the defaults for unset ones.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DatabaseError> {
        Ok(Self {
            table_name: identifier(&lookup, TABLE_NAME_PARAM, DEFAULT_TABLE_NAME)?,
            id_column: identifier(&lookup, ID_COLUMN_PARAM, DEFAULT_ID_COLUMN)?,
            discriminator_column: identifier(
                &lookup,
                DISCRIMINATOR_COLUMN_PARAM,
                DEFAULT_DISCRIMINATOR_COLUMN,
            )?,
            clean_rows: enabled(&lookup, CLEAN_ROWS_PARAM, false)?,
        })
    }

    pub fn from_system_env() -> Result<Self, DatabaseError> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn discriminator_column(&self) -> &str {
        &self.discriminator_column
    }

    pub fn clean_rows(&self) -> bool {
        self.clean_rows
    }

    pub fn with_table_name(self, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..self
        }
    }

    pub fn with_id_column(self, id_column: impl Into<String>) -> Self {
        Self {
            id_column: id_column.into(),
            ..self
        }
    }

    pub fn with_discriminator_column(self, discriminator_column: impl Into<String>) -> Self {
        Self {
            discriminator_column: discriminator_column.into(),
            ..self
        }
    }

    pub fn with_clean_rows(self, clean_rows: bool) -> Self {
        Self { clean_rows, ..self }
    }
}

fn identifier(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_value: &str,
) -> Result<String, DatabaseError> {
    match lookup(key) {
        Some(value) => {
            let value = value.trim();
            if value.is_empty() {
                Err(DatabaseError::Config(format!("Env {key} must not be empty")))
            } else {
                Ok(value.to_string())
            }
        }
        None => Ok(default_value.to_string()),
    }
}

fn enabled(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default_value: bool,
) -> Result<bool, DatabaseError> {
    match lookup(key) {
        Some(value) => match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "enabled" | "enable" => Ok(true),
            "false" | "0" | "no" | "off" | "disabled" | "disable" => Ok(false),
            _ => Err(DatabaseError::Config(format!(
                "Invalid value for {key}: {value}. Expected true, 1, yes, on, enabled, enable OR false, 0, no, off, disabled, disable"
            ))),
        },
        None => Ok(default_value),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn from_map(values: &[(&str, &str)]) -> Result<StagingTableConfig, DatabaseError> {
        let values: HashMap<String, String> = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StagingTableConfig::from_env(|key| values.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = from_map(&[]).unwrap();

        assert_eq!(config, StagingTableConfig::default());
        assert_eq!(config.table_name(), "HT_GLOBAL_TEMP_TABLE_IDS");
        assert_eq!(config.id_column(), "ID");
        assert_eq!(config.discriminator_column(), "ENTITY_NAME");
        assert!(!config.clean_rows());
    }

    #[test]
    fn overrides() {
        let config = from_map(&[
            ("EXO_BULK_ID_TABLE", "staging.BULK_IDS"),
            ("EXO_BULK_ID_COLUMN", "ROW_ID"),
            ("EXO_BULK_ID_DISCRIMINATOR_COLUMN", " KIND "),
            ("EXO_BULK_ID_CLEAN_ROWS", "Yes"),
        ])
        .unwrap();

        assert_eq!(
            config,
            StagingTableConfig::new("staging.BULK_IDS", "ROW_ID", "KIND", true)
        );
    }

    #[test]
    fn invalid_boolean() {
        let error = from_map(&[("EXO_BULK_ID_CLEAN_ROWS", "sometimes")]).unwrap_err();

        assert!(matches!(error, DatabaseError::Config(message) if message.contains("EXO_BULK_ID_CLEAN_ROWS")));
    }

    #[test]
    fn empty_identifier() {
        let error = from_map(&[("EXO_BULK_ID_TABLE", "  ")]).unwrap_err();

        assert!(matches!(error, DatabaseError::Config(_)));
    }

    #[test]
    fn builder_methods() {
        let config = StagingTableConfig::default()
            .with_table_name("IDS")
            .with_id_column("PK")
            .with_discriminator_column("TAG")
            .with_clean_rows(true);

        assert_eq!(config, StagingTableConfig::new("IDS", "PK", "TAG", true));
    }
}
