//! Schedule query error types.

use sqlx::postgres::PgDatabaseError;

/// SQLSTATE for a malformed date/time literal.
const INVALID_DATETIME_FORMAT: &str = "22007";

/// SQLSTATE for a date/time field out of range (e.g. `25:00`).
const DATETIME_FIELD_OVERFLOW: &str = "22008";

/// PostgreSQL routine that raises time literal parse failures.
const DATETIME_PARSE_ROUTINE: &str = "DateTimeParseError";

/// Failures reported by the schedule store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// The database rejected the query.
    #[error("query failed (SQLSTATE {})", .code.as_deref().unwrap_or("unknown"))]
    Query {
        code: Option<String>,
        routine: Option<String>,
        message: String,
    },

    /// The database could not be reached (pool timeout, I/O, TLS, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A row did not have the expected shape.
    #[error("unreadable row: {0}")]
    Decode(String),
}

impl StorageError {
    /// The SQLSTATE, when the database supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            StorageError::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The server routine that raised the error, when known.
    pub fn routine(&self) -> Option<&str> {
        match self {
            StorageError::Query { routine, .. } => routine.as_deref(),
            _ => None,
        }
    }

    /// Whether the store choked on a time literal we passed it.
    pub fn is_time_format(&self) -> bool {
        self.routine() == Some(DATETIME_PARSE_ROUTINE)
            || matches!(
                self.code(),
                Some(INVALID_DATETIME_FORMAT | DATETIME_FIELD_OVERFLOW)
            )
    }

    /// The error a store reports for an unreadable time literal.
    pub(crate) fn time_format(message: impl Into<String>) -> Self {
        StorageError::Query {
            code: Some(INVALID_DATETIME_FORMAT.to_string()),
            routine: Some(DATETIME_PARSE_ROUTINE.to_string()),
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => StorageError::Query {
                code: db.code().map(|c| c.into_owned()),
                routine: db
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(PgDatabaseError::routine)
                    .map(str::to_owned),
                message: db.message().to_owned(),
            },
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. } => StorageError::Decode(err.to_string()),
            _ => StorageError::Unavailable(err.to_string()),
        }
    }
}

/// Errors from the schedule and stop queries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    /// The departure time could not be read as a time of day.
    #[error("invalid time format: {0}")]
    InvalidTimeFormat(String),

    /// Nearest-stop search over an empty stop table.
    #[error("no stops available")]
    NoStopsAvailable,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ScheduleError {
    /// Lift time-literal failures out of the generic storage bucket.
    pub fn classify(err: StorageError) -> Self {
        if err.is_time_format() {
            let message = match &err {
                StorageError::Query { message, .. } => message.clone(),
                other => other.to_string(),
            };
            ScheduleError::InvalidTimeFormat(message)
        } else {
            ScheduleError::Storage(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_error(code: Option<&str>, routine: Option<&str>) -> StorageError {
        StorageError::Query {
            code: code.map(str::to_string),
            routine: routine.map(str::to_string),
            message: "invalid input syntax for type time: \"8am\"".into(),
        }
    }

    #[test]
    fn time_format_by_routine() {
        assert!(query_error(Some("XX000"), Some("DateTimeParseError")).is_time_format());
    }

    #[test]
    fn time_format_by_sqlstate() {
        assert!(query_error(Some("22007"), None).is_time_format());
        assert!(query_error(Some("22008"), None).is_time_format());
        assert!(!query_error(Some("42P01"), None).is_time_format());
        assert!(!StorageError::Unavailable("pool timed out".into()).is_time_format());
    }

    #[test]
    fn classify_splits_time_errors() {
        let err = ScheduleError::classify(query_error(Some("22007"), Some("DateTimeParseError")));
        assert!(matches!(err, ScheduleError::InvalidTimeFormat(ref m) if m.contains("8am")));

        let err = ScheduleError::classify(query_error(Some("42P01"), Some("parserOpenTable")));
        assert!(matches!(err, ScheduleError::Storage(_)));
    }

    #[test]
    fn display_hides_raw_message() {
        let err = query_error(Some("42P01"), None);
        assert_eq!(err.to_string(), "query failed (SQLSTATE 42P01)");
        assert_eq!(
            query_error(None, None).to_string(),
            "query failed (SQLSTATE unknown)"
        );
    }

    #[test]
    fn non_database_sqlx_errors() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StorageError::Unavailable(_)));

        let err = StorageError::from(sqlx::Error::ColumnNotFound("lat".into()));
        assert!(matches!(err, StorageError::Decode(_)));
    }
}
