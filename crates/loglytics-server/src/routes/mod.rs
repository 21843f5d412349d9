pub mod bulk;
pub mod clicks;
pub mod health;
pub mod purchases;
pub mod realtime;
pub mod segments;
pub mod uviews;
pub mod views;

use serde_json::Value;

use loglytics_core::period::TimeWindow;

use crate::error::{AppError, MSG_INVALID_RANGE, MSG_MISSING_RANGE};
use crate::registry::AnalyticsParams;

/// Validate and parse the `from`/`to` pair before any engine call.
pub(crate) fn require_window(params: &AnalyticsParams) -> Result<TimeWindow, AppError> {
    let (Some(from), Some(to)) = (params.from.as_deref(), params.to.as_deref()) else {
        return Err(AppError::BadRequest(MSG_MISSING_RANGE.to_string()));
    };
    TimeWindow::parse(from, to).map_err(|_| AppError::BadRequest(MSG_INVALID_RANGE.to_string()))
}

pub(crate) fn to_payload<T: serde::Serialize>(data: T) -> Result<Value, AppError> {
    serde_json::to_value(data).map_err(|e| AppError::Internal(e.into()))
}
