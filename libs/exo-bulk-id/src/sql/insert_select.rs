// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, select::Select};

/// An `INSERT INTO <table> SELECT ...` statement.
///
/// The target table name is rendered verbatim (it may carry a schema prefix) and no column
/// list is emitted, so the select list must match the target table's column order.
#[derive(Debug, PartialEq)]
pub struct InsertSelect<'a> {
    pub table_name: String,
    pub select: Select<'a>,
}

impl ExpressionBuilder for InsertSelect<'_> {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("INSERT INTO ");
        builder.push_str(&self.table_name);
        builder.push_space();
        self.select.build(builder);
    }
}
