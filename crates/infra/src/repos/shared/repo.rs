use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteResult {
    pub deleted_count: i64,
}

/// A stored row that can not be turned back into its domain type
#[derive(Error, Debug)]
#[error("Column {column} of {table} holds an invalid value: {value}")]
pub struct DecodeError {
    pub table: &'static str,
    pub column: &'static str,
    pub value: String,
}

impl DecodeError {
    pub fn new(table: &'static str, column: &'static str, value: impl Into<String>) -> Self {
        Self {
            table,
            column,
            value: value.into(),
        }
    }
}

/// Decodes every row, failing on the first one that is invalid
pub fn decode_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DecodeError>
where
    T: TryFrom<R, Error = DecodeError>,
{
    rows.into_iter().map(T::try_from).collect()
}
