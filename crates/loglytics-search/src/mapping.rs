//! Field names of the users-logs index mapping.
//!
//! `device`, `geo`, `page` and `product` are nested objects; grouping on any
//! of their fields goes through the nested branch of the aggregation builder.

pub const DATE: &str = "date";
pub const EVENT: &str = "event";
pub const TARGET: &str = "target";
pub const REFERRER: &str = "referrer";
pub const TOPICS: &str = "googleTopics";
pub const INSTANCE_ID: &str = "instance.id";

pub const DEVICE_PATH: &str = "device";
pub const DEVICE_ID: &str = "device.id";
pub const DEVICE_TYPE: &str = "device.type";
pub const DEVICE_BROWSER: &str = "device.browser";
pub const DEVICE_OS: &str = "device.os";

pub const GEO_COUNTRY: &str = "geo.country";
pub const GEO_CITY: &str = "geo.city";

pub const PAGE_TITLE: &str = "page.title";

pub const PRODUCT_ID: &str = "product.id";
pub const PRODUCT_BRAND: &str = "product.brand";
pub const PRODUCT_CATEGORY: &str = "product.category";
pub const PRODUCT_PRICE: &str = "product.price";
pub const PRODUCT_QUANTITY: &str = "product.quantity";

/// Logical alias of a tenant's event log; physical rollover indices sit
/// behind it, managed by the engine.
pub fn index_alias(client_id: i64) -> String {
    format!("users-logs-{client_id}")
}
