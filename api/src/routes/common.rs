//! Helpers shared by every resource module: list parameters, paging,
//! sorting, error envelopes and audit logging.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use db::models::audit_log::{self, AuditEntry};
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Select, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

use crate::response::ApiResponse;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

/// `page`, `per_page`, `q` and `sort` accepted by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub q: Option<String>,
    /// Comma-separated fields; a `-` prefix sorts descending.
    pub sort: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Trimmed, lowercased search term, if any.
    pub fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Runs `query` for the requested page.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    params: &ListParams,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    let page = params.page();
    let per_page = params.per_page();
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page - 1).await?;
    Ok(Page {
        items,
        page,
        per_page,
        total,
    })
}

/// Applies `sort` for the whitelisted `allowed` columns, else orders by `default`.
pub fn apply_sort<E>(
    mut query: Select<E>,
    sort: Option<&str>,
    allowed: &[&str],
    default: E::Column,
) -> Select<E>
where
    E: EntityTrait,
    E::Column: FromStr,
{
    let mut applied = false;
    for field in sort.unwrap_or_default().split(',').map(str::trim) {
        let (name, desc) = match field.strip_prefix('-') {
            Some(name) => (name, true),
            None => (field, false),
        };
        if !allowed.contains(&name) {
            continue;
        }
        if let Ok(column) = E::Column::from_str(name) {
            query = if desc {
                query.order_by_desc(column)
            } else {
                query.order_by_asc(column)
            };
            applied = true;
        }
    }
    if !applied {
        query = query.order_by_asc(default);
    }
    query
}

/// Error envelope with `data: null`.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

pub fn not_found(what: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("{what} not found"))
}

/// Logs the error and answers `500`.
pub fn db_error(context: &str, err: DbErr) -> Response {
    tracing::error!(error = %err, "{context}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
}

pub fn validation_error(errors: &ValidationErrors) -> Response {
    error_response(
        StatusCode::BAD_REQUEST,
        common::format_validation_errors(errors),
    )
}

/// Validates `req`, turning failures into a `400` response.
pub fn validate<T: Validate>(req: &T) -> Result<(), Response> {
    req.validate().map_err(|e| validation_error(&e))
}

pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("UNIQUE constraint failed")
}

pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, Response> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("{field} must be a date in YYYY-MM-DD format"),
        )
    })
}

pub fn parse_optional_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, Response> {
    raw.map(|d| parse_date(d, field)).transpose()
}

/// Optional inclusive `from`/`to` date filter read from the query string.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateRangeQuery {
    /// Parses both bounds; `400` when malformed or when `from` is after `to`.
    pub fn parse(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), Response> {
        let from = parse_optional_date(self.from.as_deref(), "from")?;
        let to = parse_optional_date(self.to.as_deref(), "to")?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "from must be on or before to",
                ));
            }
        }
        Ok((from, to))
    }
}

/// Writes an audit entry. Failures are logged and never surface to the client.
pub async fn audit(db: &DatabaseConnection, entry: AuditEntry) {
    let action = entry.action.clone();
    let resource = entry.resource_type.clone();
    if let Err(e) = audit_log::Model::record(db, entry).await {
        tracing::warn!(error = %e, %action, %resource, "Failed to write audit entry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_page_is_clamped() {
        let p = ListParams {
            per_page: Some(1000),
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(p.per_page(), MAX_PER_PAGE);
        assert_eq!(p.page(), 1);

        let p = ListParams {
            per_page: Some(0),
            ..Default::default()
        };
        assert_eq!(p.per_page(), 1);
        assert_eq!(ListParams::default().per_page(), DEFAULT_PER_PAGE);
    }

    #[test]
    fn blank_search_is_ignored() {
        let p = ListParams {
            q: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(p.search(), None);

        let p = ListParams {
            q: Some(" Math ".into()),
            ..Default::default()
        };
        assert_eq!(p.search().as_deref(), Some("math"));
    }

    #[test]
    fn dates_must_be_iso() {
        assert!(parse_date("2025-01-31", "from").is_ok());
        assert!(parse_date("31/01/2025", "from").is_err());
        assert_eq!(parse_optional_date(None, "to").unwrap(), None);
    }

    #[test]
    fn date_range_rejects_reversed_bounds() {
        let range = DateRangeQuery {
            from: Some("2025-02-01".into()),
            to: Some("2025-01-01".into()),
        };
        assert!(range.parse().is_err());

        let open = DateRangeQuery {
            from: Some("2025-01-01".into()),
            to: None,
        };
        let (from, to) = open.parse().unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(to, None);
    }
}
