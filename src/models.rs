use serde::{Deserialize, Serialize};

/// Decoded chart payload, as posted by the bot in the page's address fragment.
///
/// Shape on the wire:
/// `{"botName": "...", "baseAsset": "USD", "chartData": [{"timestamp": 1713260476000, "profit": "4.25412"}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_asset: Option<String>,
    #[serde(rename = "chartData")]
    pub observations: Vec<Observation>,
}

impl ChartPayload {
    /// Label of the single dataset: the base asset, else the bot name.
    pub fn series_label(&self) -> Option<&str> {
        self.base_asset.as_deref().or(self.bot_name.as_deref())
    }
}

/// One raw balance sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub profit: Profit,
}

/// Profit as received: bots serialize decimals as strings (`"3.67900"`),
/// hand-written payloads often use plain numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Profit {
    Number(f64),
    Text(String),
}

impl Profit {
    /// Interpret as a finite `f64`. Strings are trimmed and parsed as decimals.
    pub fn to_f64(&self) -> Option<f64> {
        let v = match self {
            Profit::Number(v) => *v,
            Profit::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    /// The value as it appeared in the payload, for error messages.
    pub fn raw(&self) -> String {
        match self {
            Profit::Number(v) => v.to_string(),
            Profit::Text(s) => s.clone(),
        }
    }
}

impl Serialize for Profit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Profit::Number(v) => serializer.serialize_f64(*v),
            Profit::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Serde helper: accept `profit` as either a JSON number or a string.
impl<'de> Deserialize<'de> for Profit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        struct ProfitVisitor;

        impl<'de> Visitor<'de> for ProfitVisitor {
            type Value = Profit;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "a number or a string holding a decimal number")
            }

            fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Profit::Number(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Profit::Number(v as f64))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Profit::Number(v as f64))
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Profit::Text(s.to_string()))
            }
        }

        deserializer.deserialize_any(ProfitVisitor)
    }
}

/// Plot-ready coordinate: `x` in epoch milliseconds, `y` the profit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: i64,
    pub y: f64,
}
