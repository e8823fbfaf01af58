use sqlx::{Postgres, QueryBuilder};

use crate::application::repos::RepoError;

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("duplicate key") => {
            RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db.message().contains("violates foreign key constraint")
                || db.message().contains("invalid input syntax")
                || db.message().contains("invalid input value for enum") =>
        {
            RepoError::InvalidInput {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("violates") => RepoError::Integrity {
            message: db.message().to_string(),
        },
        sqlx::Error::Database(db)
            if db
                .message()
                .contains("canceling statement due to user request") =>
        {
            RepoError::Timeout
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}

/// `%term%` with LIKE metacharacters escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Append ` AND (col1 ILIKE $p OR col2 ILIKE $p ...)` for nullable text columns.
pub fn push_search<'q>(qb: &mut QueryBuilder<'q, Postgres>, columns: &[&str], term: &str) {
    let pattern = contains_pattern(term);
    qb.push(" AND (");
    for (index, column) in columns.iter().enumerate() {
        if index > 0 {
            qb.push(" OR ");
        }
        qb.push("COALESCE(");
        qb.push(*column);
        qb.push(", '') ILIKE ");
        qb.push_bind(pattern.clone());
    }
    qb.push(")");
}
