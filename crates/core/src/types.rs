/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Prize identifiers as they appear in the prize table.
pub type PrizeId = String;
