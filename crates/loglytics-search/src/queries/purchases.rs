//! Purchase counts and revenue: totals with comparison, daily trend and
//! dimension breakdowns, each carrying the revenue sum.

use serde_json::{json, Value};

use loglytics_core::analytics::{DailyRevenue, PurchaseTotals, RevenueGroupRow};
use loglytics_core::period::TimeWindow;

use crate::{aggs, decode};

const EVENT: &str = "purchase";

fn count_and_revenue() -> Value {
    json!({
        "total_purchases": { "value_count": { "field": "date" } },
        "total_revenue": aggs::revenue_sum(),
    })
}

pub fn total_body(window: &TimeWindow) -> Value {
    let prev = window.previous();
    json!({
        "query": aggs::base_query(EVENT, Some((&prev.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": {
            "current_purchases":
                aggs::range_slice(&window.iso_from(), &window.iso_to(), count_and_revenue()),
            "previous_purchases":
                aggs::range_slice(&prev.iso_from(), &prev.iso_to(), count_and_revenue()),
        }
    })
}

pub fn decode_totals(resp: &Value) -> PurchaseTotals {
    PurchaseTotals {
        current_purchases: decode::agg_u64(resp, &["current_purchases", "total_purchases"]),
        previous_purchases: decode::agg_u64(resp, &["previous_purchases", "total_purchases"]),
        current_revenue: decode::agg_f64(resp, &["current_purchases", "total_revenue"]),
        previous_revenue: decode::agg_f64(resp, &["previous_purchases", "total_revenue"]),
    }
}

pub fn daily_body(window: &TimeWindow) -> Value {
    let mut daily = aggs::daily_histogram();
    daily["aggs"] = json!({ "total_revenue": aggs::revenue_sum() });
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "daily": daily }
    })
}

pub fn decode_daily(resp: &Value) -> Vec<DailyRevenue> {
    decode::buckets(resp, &["daily"])
        .iter()
        .map(|bucket| DailyRevenue {
            date: decode::bucket_key_string(bucket),
            count: decode::doc_count(bucket),
            revenue: decode::bucket_f64(bucket, &["total_revenue"]),
        })
        .collect()
}

pub fn group_body(window: &TimeWindow, field: &str) -> Value {
    let revenue = aggs::revenue_sum();
    json!({
        "query": aggs::base_query(EVENT, Some((&window.iso_from(), &window.iso_to()))),
        "size": 0,
        "aggs": { "group_by": aggs::group_by(field, Some(("total_revenue", &revenue))) }
    })
}

pub fn decode_groups(resp: &Value) -> Vec<RevenueGroupRow> {
    decode::group_buckets(resp)
        .iter()
        .map(|bucket| RevenueGroupRow {
            key: decode::bucket_key(bucket),
            count: decode::doc_count(bucket),
            revenue: decode::bucket_f64(bucket, &["total_revenue"]),
        })
        .collect()
}
