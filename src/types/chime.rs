//! ChimeType: the logical chimes a soundpack can provide.
//!
//! Each chime type maps to one file stem inside a soundpack directory
//! and to the minutes of the hour at which it is due.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies which audio asset to play for a given time boundary.
///
/// Variants are ordered by precedence: `Hour` is the only chime a
/// soundpack must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChimeType {
    /// Top of the hour (minute 0). Mandatory for every soundpack.
    Hour,
    /// Half past (minute 30).
    Half,
    /// Quarter past and quarter to (minutes 15 and 45).
    Quarter,
}

impl ChimeType {
    /// All chime types in precedence order.
    pub const ALL: [ChimeType; 3] = [ChimeType::Hour, ChimeType::Half, ChimeType::Quarter];

    /// Returns the file stem / wire name for this chime type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChimeType::Hour => "hour",
            ChimeType::Half => "half",
            ChimeType::Quarter => "quarter",
        }
    }

    /// Parses a chime type from user input.
    ///
    /// Case-insensitive. `half_hour` and `quarter_hour` are accepted as aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hour" | "hourly" => Some(ChimeType::Hour),
            "half" | "half_hour" => Some(ChimeType::Half),
            "quarter" | "quarter_hour" => Some(ChimeType::Quarter),
            _ => None,
        }
    }

    /// Returns the chime type due at `minute`, if any.
    ///
    /// minute 0 → hour, 30 → half, 15 or 45 → quarter, otherwise none.
    pub fn for_minute(minute: u8) -> Option<Self> {
        match minute {
            0 => Some(ChimeType::Hour),
            30 => Some(ChimeType::Half),
            15 | 45 => Some(ChimeType::Quarter),
            _ => None,
        }
    }
}

impl fmt::Display for ChimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_parsing() {
        assert_eq!(ChimeType::parse("hour"), Some(ChimeType::Hour));
        assert_eq!(ChimeType::parse("HALF"), Some(ChimeType::Half));
        assert_eq!(ChimeType::parse("half_hour"), Some(ChimeType::Half));
        assert_eq!(ChimeType::parse(" quarter "), Some(ChimeType::Quarter));
        assert_eq!(ChimeType::parse("quarter_hour"), Some(ChimeType::Quarter));
        assert_eq!(ChimeType::parse("minute"), None);
    }

    #[test]
    fn due_type_per_minute() {
        assert_eq!(ChimeType::for_minute(0), Some(ChimeType::Hour));
        assert_eq!(ChimeType::for_minute(15), Some(ChimeType::Quarter));
        assert_eq!(ChimeType::for_minute(30), Some(ChimeType::Half));
        assert_eq!(ChimeType::for_minute(45), Some(ChimeType::Quarter));

        let due: Vec<u8> = (0..60).filter(|m| ChimeType::for_minute(*m).is_some()).collect();
        assert_eq!(due, vec![0, 15, 30, 45]);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&ChimeType::Quarter).unwrap(), "\"quarter\"");
        let parsed: ChimeType = serde_json::from_str("\"half\"").unwrap();
        assert_eq!(parsed, ChimeType::Half);
    }
}
