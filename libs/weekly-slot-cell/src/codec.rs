// Text encoding of one weekly-slot day cell. The column holds one of three
// shapes: an empty string, the break sentinel, or a JSON booking object.
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

/// Marks a non-bookable rest period; distinct from an empty cell.
pub const BREAK_SENTINEL: &str = "ISTIRAHAT";

const LEGACY_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Booking {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "t", default)]
    pub phone: String,
    #[serde(rename = "d", default)]
    pub department: String,
    #[serde(rename = "pid", default)]
    pub patient_id: String,
}

impl Booking {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotValue {
    #[default]
    Empty,
    Break,
    Booking(Booking),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotCodecError {
    #[error("Nama pasien wajib diisi untuk booking")]
    MissingName,
}

impl SlotValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, SlotValue::Empty)
    }

    /// Checks values coming from clients; parsed values are always valid.
    pub fn validate(self) -> Result<SlotValue, SlotCodecError> {
        match self {
            SlotValue::Booking(booking) => {
                let name = booking.name.trim();
                if name.is_empty() {
                    return Err(SlotCodecError::MissingName);
                }
                Ok(SlotValue::Booking(Booking {
                    name: name.to_string(),
                    phone: booking.phone.trim().to_string(),
                    department: booking.department.trim().to_string(),
                    patient_id: booking.patient_id.trim().to_string(),
                }))
            }
            other => Ok(other),
        }
    }
}

#[derive(Deserialize)]
struct RawBooking {
    n: Option<String>,
    #[serde(default)]
    t: Option<String>,
    #[serde(default)]
    d: Option<String>,
    #[serde(default)]
    pid: Option<serde_json::Value>,
}

/// Never fails: text that is neither empty, the sentinel, nor a booking
/// object is read as a legacy "name - department" label.
pub fn parse(raw: &str) -> SlotValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return SlotValue::Empty;
    }
    if trimmed == BREAK_SENTINEL {
        return SlotValue::Break;
    }

    if let Ok(RawBooking { n: Some(name), t, d, pid }) = serde_json::from_str::<RawBooking>(trimmed) {
        let patient_id = match pid {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        return SlotValue::Booking(Booking {
            name,
            phone: t.unwrap_or_default(),
            department: d.unwrap_or_default(),
            patient_id,
        });
    }

    let booking = match raw.split_once(LEGACY_SEPARATOR) {
        Some((name, department)) => Booking {
            name: name.to_string(),
            department: department.to_string(),
            ..Booking::default()
        },
        None => Booking::new(raw),
    };
    SlotValue::Booking(booking)
}

pub fn serialize(value: &SlotValue) -> String {
    match value {
        SlotValue::Empty => String::new(),
        SlotValue::Break => BREAK_SENTINEL.to_string(),
        SlotValue::Booking(booking) => json!({
            "n": booking.name,
            "t": booking.phone,
            "d": booking.department,
            "pid": booking.patient_id,
        })
        .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_break() {
        assert_eq!(parse(""), SlotValue::Empty);
        assert_eq!(parse(BREAK_SENTINEL), SlotValue::Break);
        assert_eq!(serialize(&SlotValue::Empty), "");
        assert_eq!(serialize(&SlotValue::Break), "ISTIRAHAT");
    }

    #[test]
    fn test_booking_round_trip() {
        let value = SlotValue::Booking(Booking {
            name: "Jane".to_string(),
            phone: "0812-3456".to_string(),
            department: "Konservasi".to_string(),
            patient_id: "8c1f".to_string(),
        });
        assert_eq!(parse(&serialize(&value)), value);

        // Characters that would break a naive encoding survive too.
        let tricky = SlotValue::Booking(Booking::new("A \"quoted\" - name {}"));
        assert_eq!(parse(&serialize(&tricky)), tricky);
    }

    #[test]
    fn test_booking_missing_optional_keys() {
        assert_eq!(parse(r#"{"n":"Budi"}"#), SlotValue::Booking(Booking::new("Budi")));
        match parse(r#"{"n":"Budi","pid":42}"#) {
            SlotValue::Booking(booking) => assert_eq!(booking.patient_id, "42"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_legacy_text_fallback() {
        assert_eq!(
            parse("Jane - 2024-01-01"),
            SlotValue::Booking(Booking {
                name: "Jane".to_string(),
                department: "2024-01-01".to_string(),
                ..Booking::default()
            })
        );
        assert_eq!(parse("Jane"), SlotValue::Booking(Booking::new("Jane")));
        // Splits on the first separator only.
        match parse("A - B - C") {
            SlotValue::Booking(booking) => {
                assert_eq!(booking.name, "A");
                assert_eq!(booking.department, "B - C");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_json_without_name_is_legacy_text() {
        let raw = r#"{"t":"0812"}"#;
        assert_eq!(parse(raw), SlotValue::Booking(Booking::new(raw)));
    }

    #[test]
    fn test_validate_requires_name() {
        let value = SlotValue::Booking(Booking::new("   "));
        assert_eq!(value.validate(), Err(SlotCodecError::MissingName));
        assert_eq!(SlotValue::Break.validate(), Ok(SlotValue::Break));
    }

    #[test]
    fn test_api_shape_is_tagged() {
        let json = serde_json::to_value(SlotValue::Booking(Booking::new("Ani"))).unwrap();
        assert_eq!(json["kind"], "booking");
        assert_eq!(json["n"], "Ani");
        assert_eq!(serde_json::to_value(SlotValue::Break).unwrap()["kind"], "break");
    }
}
