//! SQL construction for configured table and column names.
//!
//! Table and column names come from configuration, so they are always
//! emitted as quoted identifiers. Row ids are always bound parameters.

use crate::models::TargetTable;

/// Quotes an identifier for `SQLite`, doubling embedded quotes.
///
/// # Examples
///
/// ```
/// use wordsweep::storage::sqlite::quote_ident;
///
/// assert_eq!(quote_ident("t_tx_out"), "\"t_tx_out\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `SELECT id, payload FROM table`.
#[must_use]
pub fn select_payloads_sql(target: &TargetTable) -> String {
    format!(
        "SELECT {}, {} FROM {}",
        quote_ident(&target.id_column),
        quote_ident(&target.payload_column),
        quote_ident(&target.table)
    )
}

/// `DELETE FROM table WHERE id = ?1`.
#[must_use]
pub fn delete_row_sql(target: &TargetTable) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?1",
        quote_ident(&target.table),
        quote_ident(&target.id_column)
    )
}

/// `UPDATE table SET column = '' WHERE id = ?1`.
#[must_use]
pub fn clear_field_sql(target: &TargetTable, column: &str) -> String {
    format!(
        "UPDATE {} SET {} = '' WHERE {} = ?1",
        quote_ident(&target.table),
        quote_ident(column),
        quote_ident(&target.id_column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_uses_named_columns() {
        let target = TargetTable::contract_call().with_payload_column("body");
        assert_eq!(
            select_payloads_sql(&target),
            r#"SELECT "id", "body" FROM "t_contract_call""#
        );
    }

    #[test]
    fn test_delete_binds_id() {
        assert_eq!(
            delete_row_sql(&TargetTable::contract_call()),
            r#"DELETE FROM "t_contract_call" WHERE "id" = ?1"#
        );
    }

    #[test]
    fn test_clear_field() {
        assert_eq!(
            clear_field_sql(&TargetTable::tx_out(), "contract"),
            r#"UPDATE "t_tx_out" SET "contract" = '' WHERE "id" = ?1"#
        );
    }

    #[test]
    fn test_quote_ident_escapes_injection() {
        let target = TargetTable::contract_call().with_table("x\"; DROP TABLE y; --");
        assert!(delete_row_sql(&target).starts_with(r#"DELETE FROM "x""; DROP TABLE y; --""#));
    }
}
