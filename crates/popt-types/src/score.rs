use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::TypeError;

/// Quality score assigned by the completion model, always in `0..=100`.
///
/// An entry without a score holds `Option::<Score>::None`, which serializes
/// as JSON `null`. That keeps "unscored" distinct from a score of zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Score(u8);

impl Score {
    /// Highest possible score.
    pub const MAX: u8 = 100;

    /// Create a score, rejecting values above 100.
    pub fn new(value: u8) -> Result<Self, TypeError> {
        if value > Self::MAX {
            return Err(TypeError::ScoreOutOfRange(i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Create a score, saturating into `0..=100`.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, i64::from(Self::MAX)) as u8)
    }

    /// Validate a JSON number. Fractional or non-finite values are rejected.
    pub fn from_f64(value: f64) -> Result<Self, TypeError> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(TypeError::InvalidRecord(format!(
                "score must be an integer, got {value}"
            )));
        }
        if !(0.0..=f64::from(Self::MAX)).contains(&value) {
            return Err(TypeError::ScoreOutOfRange(value as i64));
        }
        Ok(Self(value as u8))
    }

    /// Read a loosely typed score: a number or a numeric string, rounded and
    /// clamped into range. Anything else (including `null`) is unscored.
    pub fn from_json(value: &Value) -> Option<Self> {
        let raw = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        raw.is_finite().then(|| Self::clamped(raw.round() as i64))
    }

    /// The raw value.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Quality band used for display.
    pub fn band(self) -> ScoreBand {
        match self.0 {
            80..=u8::MAX => ScoreBand::Good,
            60..=79 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }

    /// Human-readable label for an optional score.
    pub fn describe(score: Option<Score>) -> String {
        match score {
            Some(s) => format!("Score: {s}"),
            None => "No score".to_string(),
        }
    }
}

impl TryFrom<i64> for Score {
    type Error = TypeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(0..=i64::from(Self::MAX)).contains(&value) {
            return Err(TypeError::ScoreOutOfRange(value));
        }
        Ok(Self(value as u8))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score({})", self.0)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Score::from_f64(raw).map_err(serde::de::Error::custom)
    }
}

/// Display band for a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    /// 80 and above.
    Good,
    /// 60 to 79.
    Fair,
    /// Below 60.
    Poor,
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::Poor => "poor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_rejects_above_100() {
        assert!(Score::new(100).is_ok());
        assert_eq!(Score::new(101), Err(TypeError::ScoreOutOfRange(101)));
    }

    #[test]
    fn try_from_rejects_negative() {
        assert_eq!(Score::try_from(-1), Err(TypeError::ScoreOutOfRange(-1)));
        assert_eq!(Score::try_from(42).unwrap().value(), 42);
    }

    #[test]
    fn from_json_accepts_loose_shapes() {
        use serde_json::json;
        let read = |v: Value| Score::from_json(&v).map(Score::value);
        assert_eq!(read(json!(85)), Some(85));
        assert_eq!(read(json!("85")), Some(85));
        assert_eq!(read(json!(" 72.5 ")), Some(73));
        assert_eq!(read(json!(72.4)), Some(72));
        assert_eq!(read(json!(-3)), Some(0));
        assert_eq!(read(json!(140)), Some(100));
        assert_eq!(read(json!("high")), None);
        assert_eq!(read(json!("NaN")), None);
        assert_eq!(read(json!(null)), None);
        assert_eq!(read(json!([90])), None);
    }

    #[test]
    fn clamped_saturates() {
        assert_eq!(Score::clamped(-20).value(), 0);
        assert_eq!(Score::clamped(250).value(), 100);
        assert_eq!(Score::clamped(55).value(), 55);
    }

    #[test]
    fn bands() {
        assert_eq!(Score::clamped(100).band(), ScoreBand::Good);
        assert_eq!(Score::clamped(80).band(), ScoreBand::Good);
        assert_eq!(Score::clamped(79).band(), ScoreBand::Fair);
        assert_eq!(Score::clamped(60).band(), ScoreBand::Fair);
        assert_eq!(Score::clamped(59).band(), ScoreBand::Poor);
        assert_eq!(Score::clamped(0).band(), ScoreBand::Poor);
    }

    #[test]
    fn describe_distinguishes_zero_from_unscored() {
        assert_eq!(Score::describe(Some(Score::clamped(0))), "Score: 0");
        assert_eq!(Score::describe(None), "No score");
    }

    #[test]
    fn json_null_is_unscored() {
        let s: Option<Score> = serde_json::from_str("null").unwrap();
        assert!(s.is_none());
        let z: Option<Score> = serde_json::from_str("0").unwrap();
        assert_eq!(z, Some(Score::clamped(0)));
    }

    #[test]
    fn json_rejects_fractional_and_out_of_range() {
        assert!(serde_json::from_str::<Score>("85.5").is_err());
        assert!(serde_json::from_str::<Score>("101").is_err());
        assert!(serde_json::from_str::<Score>("-3").is_err());
        assert_eq!(serde_json::from_str::<Score>("85.0").unwrap().value(), 85);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Score::clamped(73)).unwrap(), "73");
    }

    proptest! {
        #[test]
        fn clamped_is_always_in_range(v in any::<i64>()) {
            let score = Score::clamped(v);
            prop_assert!(score.value() <= Score::MAX);
            if (0..=100).contains(&v) {
                prop_assert_eq!(i64::from(score.value()), v);
            }
        }
    }
}
