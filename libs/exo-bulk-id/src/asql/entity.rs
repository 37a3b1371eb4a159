// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Debug;

use crate::sql::physical_table::{PhysicalTable, PhysicalTableName};

/// Mapping metadata of an entity that bulk operations need.
pub trait EntityDescriptor: Debug + Send + Sync {
    /// The logical name of the entity such as "Order". Stable across runs (comes from the
    /// mapping, not from the data).
    fn entity_name(&self) -> &str;

    /// The tables holding the entity's data, root table first. Each table holds one row per
    /// entity instance, keyed by the entity id.
    fn tables(&self) -> &[PhysicalTable];

    fn root_table(&self) -> &PhysicalTable;

    fn table(&self, table_name: &PhysicalTableName) -> Option<&PhysicalTable> {
        self.tables().iter().find(|table| &table.name == table_name)
    }
}

/// An [`EntityDescriptor`] built directly from table definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMapping {
    name: String,
    /// Never empty: the root table is always the first element
    tables: Vec<PhysicalTable>,
}

impl EntityMapping {
    pub fn new(name: impl Into<String>, root_table: PhysicalTable) -> Self {
        Self {
            name: name.into(),
            tables: vec![root_table],
        }
    }

    /// Add a table holding more of the entity's data (a subclass or secondary table). Its key
    /// columns must reference the root table's id.
    pub fn with_table(mut self, table: PhysicalTable) -> Self {
        self.tables.push(table);
        self
    }
}

impl EntityDescriptor for EntityMapping {
    fn entity_name(&self) -> &str {
        &self.name
    }

    fn tables(&self) -> &[PhysicalTable] {
        &self.tables
    }

    fn root_table(&self) -> &PhysicalTable {
        &self.tables[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_table_comes_first() {
        let orders = PhysicalTableName::new("orders", None);
        let audits = PhysicalTableName::new("order_audits", None);

        let entity = EntityMapping::new(
            "Order",
            PhysicalTable::new(orders.clone(), &["id"], &["status"]),
        )
        .with_table(PhysicalTable::new(audits.clone(), &["order_id"], &["reviewed"]));

        assert_eq!(entity.entity_name(), "Order");
        assert_eq!(entity.root_table().name, orders);
        assert_eq!(entity.tables().len(), 2);
        assert_eq!(
            entity.table(&audits).map(|t| t.key_columns.clone()),
            Some(vec!["order_id".to_string()])
        );
        assert!(entity.table(&PhysicalTableName::new("customers", None)).is_none());
    }
}
