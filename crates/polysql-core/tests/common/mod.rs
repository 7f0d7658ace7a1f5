#![allow(dead_code)]

use polysql_core::{Builder, ColumnOptions, ColumnType, Dialect};

/// The `users` table used across the DDL tests.
pub fn users_table(dialect: Dialect) -> Builder {
    Builder::new(dialect)
        .table("users")
        .column(
            "id",
            ColumnType::String,
            ColumnOptions::new().primary().length(40),
        )
        .column("image", ColumnType::Blob, ColumnOptions::new())
        .column("price_default", ColumnType::Decimal, ColumnOptions::new())
        .column(
            "price_custom",
            ColumnType::Decimal,
            ColumnOptions::new().length(12).decimals(10),
        )
        .column("created_at", ColumnType::Datetime, ColumnOptions::new())
        .column(
            "deleted_at",
            ColumnType::Datetime,
            ColumnOptions::new().nullable(),
        )
}

pub fn all_dialects() -> [Dialect; 3] {
    [Dialect::MySql, Dialect::Postgres, Dialect::Sqlite]
}

pub fn full_select(dialect: Dialect) -> String {
    Builder::new(dialect)
        .table("users")
        .and_where("first_name", "!=", "Jane")
        .order_by("first_name", "asc")
        .limit(10)
        .offset(20)
        .group_by("passport")
        .select(["id", "first_name", "last_name"])
        .unwrap_or_else(|e| panic!("Failed to compile select: {e}"))
}
