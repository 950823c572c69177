//! Pickup point endpoints

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{PickupPoint, PickupPointCreate, PickupPointView};

use crate::db::DateRange;
use crate::service::aggregate::{self, Pagination};
use crate::service::pickup_point;
use crate::state::AppState;

use super::{ApiResult, JsonBody};

/// Raw listing query; every value is validated by hand so errors carry
/// field-specific messages
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

fn parse_date(raw: Option<&str>, field: &'static str) -> AppResult<Option<DateTime<Utc>>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|d| d.with_timezone(&Utc))
                .map_err(|_| {
                    AppError::with_message(ErrorCode::InvalidFormat, "date must be in RFC3339 format")
                        .with_detail("field", field)
                })
        })
        .transpose()
}

fn parse_number(raw: Option<&str>, field: &'static str) -> AppResult<Option<i64>> {
    raw.filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| {
                AppError::with_message(ErrorCode::InvalidFormat, format!("{field} must be an integer"))
                    .with_detail("field", field)
            })
        })
        .transpose()
}

impl ListParams {
    pub fn date_range(&self) -> AppResult<DateRange> {
        let range = DateRange {
            start: parse_date(self.start_date.as_deref(), "startDate")?,
            end: parse_date(self.end_date.as_deref(), "endDate")?,
        };
        if let (Some(start), Some(end)) = (range.start, range.end)
            && end < start
        {
            return Err(AppError::validation("end date must be after start date"));
        }
        Ok(range)
    }

    pub fn pagination(&self) -> AppResult<Pagination> {
        Ok(Pagination::new(
            parse_number(self.page.as_deref(), "page")?,
            parse_number(self.limit.as_deref(), "limit")?,
        ))
    }
}

/// POST /pvz
pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<PickupPointCreate>,
) -> Result<(StatusCode, Json<PickupPoint>), AppError> {
    let pvz = pickup_point::create(state.store.as_ref(), &req.city).await?;
    Ok((StatusCode::CREATED, Json(pvz)))
}

/// GET /pvz
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<Vec<PickupPointView>> {
    let Query(params) = params.map_err(|e| {
        AppError::invalid_request("invalid query").with_detail("reason", e.body_text())
    })?;
    let range = params.date_range()?;
    let pagination = params.pagination()?;

    let views = aggregate::list(state.store.as_ref(), range, pagination).await?;
    Ok(Json(views))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: Option<&str>, end: Option<&str>) -> ListParams {
        ListParams {
            start_date: start.map(String::from),
            end_date: end.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_date_range_parsing() {
        let range = params(Some("2025-01-01T00:00:00Z"), Some("2025-01-02T00:00:00+03:00"))
            .date_range()
            .unwrap();
        assert!(range.start.is_some());
        assert!(range.end.is_some());

        assert_eq!(params(None, None).date_range().unwrap(), DateRange::default());
    }

    #[test]
    fn test_date_range_errors() {
        let err = params(Some("yesterday"), None).date_range().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidFormat);

        let err = params(Some("2025-02-01T00:00:00Z"), Some("2025-01-01T00:00:00Z"))
            .date_range()
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_pagination_parsing() {
        let p = ListParams {
            page: Some("2".into()),
            limit: Some("50".into()),
            ..Default::default()
        };
        assert_eq!(p.pagination().unwrap(), Pagination { page: 2, limit: 10 });

        let p = ListParams {
            page: Some("5000000000".into()),
            ..Default::default()
        };
        assert_eq!(p.pagination().unwrap().page, u32::MAX);

        let p = ListParams {
            page: Some("two".into()),
            ..Default::default()
        };
        assert_eq!(p.pagination().unwrap_err().code, ErrorCode::InvalidFormat);
    }
}
