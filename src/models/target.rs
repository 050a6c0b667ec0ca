//! Target tables and row identifiers.

use std::fmt;

/// Primary key of a row in a target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(i64);

impl RowId {
    /// Wraps a primary key value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw key.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// What happens to a row whose payload matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationAction {
    /// The row is deleted.
    Delete,
    /// The named column is set to the empty string; the row is kept.
    Redact {
        /// Column that is cleared.
        column: String,
    },
}

impl RemediationAction {
    /// Past-tense verb used in remediation reports.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::Delete => "deleted",
            Self::Redact { .. } => "updated",
        }
    }
}

/// Which of the two watched tables a target describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Contract call rows; matches are deleted.
    ContractCall,
    /// Transaction output rows; matches have their contract field cleared.
    TxOut,
}

impl TargetKind {
    /// Returns the kind as a string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContractCall => "contract_call",
            Self::TxOut => "tx_out",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A table scanned for sensitive words.
///
/// Columns are referenced by name, never by position, so reordering the
/// schema cannot silently point the matcher at the wrong column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTable {
    /// Which table this is.
    pub kind: TargetKind,
    /// Table name in the store.
    pub table: String,
    /// Primary key column.
    pub id_column: String,
    /// Text column matched against the word set.
    pub payload_column: String,
    /// Action applied to matching rows.
    pub action: RemediationAction,
}

impl TargetTable {
    /// The contract call table with its default column names.
    #[must_use]
    pub fn contract_call() -> Self {
        Self {
            kind: TargetKind::ContractCall,
            table: "t_contract_call".to_string(),
            id_column: "id".to_string(),
            payload_column: "data".to_string(),
            action: RemediationAction::Delete,
        }
    }

    /// The transaction output table with its default column names.
    #[must_use]
    pub fn tx_out() -> Self {
        Self {
            kind: TargetKind::TxOut,
            table: "t_tx_out".to_string(),
            id_column: "id".to_string(),
            payload_column: "data".to_string(),
            action: RemediationAction::Redact {
                column: "contract".to_string(),
            },
        }
    }

    /// Sets the table name.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the payload column.
    #[must_use]
    pub fn with_payload_column(mut self, column: impl Into<String>) -> Self {
        self.payload_column = column.into();
        self
    }
}
