//! SQL for hard-deleting soft-deleted console rows.
//!
//! Statements use `$1` placeholders, which both Postgres and SQLite accept, and every
//! `DELETE` is guarded by `deleted = true` so an active row is never touched.

use jitsu_console_schema::StorageTable;

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// `"schema"."Table"` or just `"Table"` when no schema is configured.
pub(crate) fn qualified_table(table: StorageTable, schema: Option<&str>) -> String {
    match schema {
        Some(schema) => format!(
            "{}.{}",
            quote_ident(schema),
            quote_ident(table.table_name())
        ),
        None => quote_ident(table.table_name()),
    }
}

/// Soft-deleted links whose either end is the object being purged.
pub(crate) fn purge_referencing_links_sql(schema: Option<&str>) -> String {
    format!(
        r#"DELETE FROM {} WHERE deleted = true AND ("fromId" = $1 OR "toId" = $1)"#,
        qualified_table(StorageTable::Link, schema)
    )
}

/// The soft-deleted row itself.
pub(crate) fn purge_row_sql(table: StorageTable, schema: Option<&str>) -> String {
    format!(
        "DELETE FROM {} WHERE id = $1 AND deleted = true",
        qualified_table(table, schema)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_schema_qualified_and_quoted() {
        assert_eq!(
            qualified_table(StorageTable::Object, Some("newjitsu")),
            r#""newjitsu"."ConfigurationObject""#
        );
        assert_eq!(
            qualified_table(StorageTable::Link, None),
            r#""ConfigurationObjectLink""#
        );
    }

    #[test]
    fn identifiers_cannot_break_out_of_quotes() {
        assert_eq!(
            qualified_table(StorageTable::Object, Some(r#"x"; DROP TABLE y; --"#)),
            r#""x""; DROP TABLE y; --"."ConfigurationObject""#
        );
    }

    #[test]
    fn every_purge_statement_is_guarded_by_deleted_flag() {
        for sql in [
            purge_referencing_links_sql(Some("newjitsu")),
            purge_row_sql(StorageTable::Object, Some("newjitsu")),
            purge_row_sql(StorageTable::Link, None),
        ] {
            assert!(sql.contains("deleted = true"), "{sql}");
            assert!(sql.starts_with("DELETE FROM "), "{sql}");
        }
    }

    #[test]
    fn link_purge_matches_both_ends() {
        let sql = purge_referencing_links_sql(None);
        assert!(sql.contains(r#""fromId" = $1 OR "toId" = $1"#), "{sql}");
    }
}
