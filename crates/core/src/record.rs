//! Persisted win records.

use chrono::SubsecRound;
use serde::{Deserialize, Serialize};

use crate::draw::PendingDraw;
use crate::types::{PrizeId, Timestamp};

/// One revealed win.
///
/// Captures a snapshot of the prize label and value so the record survives
/// later prize table changes. The only field that ever changes after
/// creation is `synced`, and only from `false` to `true`.
///
/// Serialized in camelCase with an epoch-millisecond `timestamp`, the
/// layout the stored history has always used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRecord {
    /// Voucher code.
    pub id: String,
    pub prize_id: PrizeId,
    pub label: String,
    pub value: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: Timestamp,
    /// Greeting shown with the reveal. Older histories call it `aiMessage`.
    #[serde(alias = "aiMessage")]
    pub message: String,
    /// Whether the remote ledger acknowledged this win.
    #[serde(default)]
    pub synced: bool,
}

impl WinRecord {
    /// Build an unsynced record for a revealed draw.
    ///
    /// `at` is truncated to whole milliseconds, the resolution storage keeps.
    pub fn from_draw(draw: &PendingDraw, id: String, at: Timestamp) -> Self {
        Self {
            id,
            prize_id: draw.prize.id.clone(),
            label: draw.prize.label.clone(),
            value: draw.prize.value,
            timestamp: at.trunc_subsecs(3),
            message: draw.message.clone(),
            synced: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prize::PrizeDefinition;
    use chrono::{TimeZone, Utc};

    fn sample_record() -> WinRecord {
        let draw = PendingDraw::new(PrizeDefinition::new("lucky-88", "Lucky Money $88", 88, 0.07));
        WinRecord::from_draw(
            &draw,
            "ET-88-AB12C".into(),
            Utc.timestamp_millis_opt(1_769_220_000_123).unwrap(),
        )
    }

    #[test]
    fn from_draw_snapshots_prize_and_starts_unsynced() {
        let record = sample_record();
        assert_eq!(record.prize_id, "lucky-88");
        assert_eq!(record.label, "Lucky Money $88");
        assert_eq!(record.value, 88);
        assert!(!record.synced);
        assert!(!record.message.is_empty());
    }

    #[test]
    fn from_draw_drops_sub_millisecond_precision() {
        let draw = PendingDraw::new(PrizeDefinition::new("lucky-8", "Lucky Money $8", 8, 0.45));
        let at = Utc.timestamp_opt(1_769_220_000, 123_456_789).unwrap();

        let record = WinRecord::from_draw(&draw, "ET-8-AAAAA".into(), at);

        assert_eq!(record.timestamp.timestamp_subsec_nanos(), 123_000_000);
        let json = serde_json::to_string(&record).unwrap();
        let decoded: WinRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn serializes_camel_case_with_millisecond_timestamp() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["prizeId"], "lucky-88");
        assert_eq!(json["timestamp"], 1_769_220_000_123_i64);
        assert_eq!(json["synced"], false);
    }

    #[test]
    fn accepts_legacy_ai_message_field() {
        let raw = r#"{
            "id": "ET-8-ZZZZZ",
            "prizeId": "lucky-8",
            "label": "Lucky Money $8",
            "value": 8,
            "timestamp": 1769220000000,
            "aiMessage": "hello",
            "synced": true
        }"#;
        let record: WinRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.message, "hello");
        assert!(record.synced);
    }

    #[test]
    fn missing_synced_defaults_to_false() {
        let raw = r#"{"id":"x","prizeId":"p","label":"l","value":1,"timestamp":0,"message":"m"}"#;
        let record: WinRecord = serde_json::from_str(raw).unwrap();
        assert!(!record.synced);
    }
}
