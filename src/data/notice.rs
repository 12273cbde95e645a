use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Bid type of a notice. The API sends either the display label
/// (`용역`) or the service code (`servc`); anything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BidCategory {
    Service,
    Construction,
    Goods,
    Other(String),
}

impl BidCategory {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "용역" | "servc" => BidCategory::Service,
            "건설공사" | "공사" | "cnstwk" => BidCategory::Construction,
            "물품" | "thng" => BidCategory::Goods,
            other => BidCategory::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BidCategory::Service => "용역",
            BidCategory::Construction => "건설공사",
            BidCategory::Goods => "물품",
            BidCategory::Other(code) => code,
        }
    }
}

impl Default for BidCategory {
    fn default() -> Self {
        BidCategory::Other(String::new())
    }
}

impl From<String> for BidCategory {
    fn from(code: String) -> Self {
        BidCategory::from_code(&code)
    }
}

impl From<BidCategory> for String {
    fn from(category: BidCategory) -> Self {
        category.label().to_string()
    }
}

/// One procurement announcement as returned by the search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BidNotice {
    pub id: String,
    #[serde(rename = "bidType", default)]
    pub category: BidCategory,
    #[serde(rename = "bidNtceDt", default, deserialize_with = "lenient_string")]
    pub announced_at: Option<String>,
    #[serde(rename = "bidClseDt", default, deserialize_with = "lenient_string")]
    pub closes_at: Option<String>,
    #[serde(rename = "bidNtceNm", default)]
    pub title: String,
    #[serde(rename = "bidNtceNo", default)]
    pub notice_no: String,
    #[serde(rename = "dminsttNm", default)]
    pub agency: String,
    #[serde(rename = "ntceInsttNm", default, deserialize_with = "lenient_string")]
    pub announcing_agency: Option<String>,
    /// Numeric string, or `N/A` when the announcement carries no estimate
    #[serde(rename = "presmptPrce", default, deserialize_with = "lenient_string")]
    pub estimated_price: Option<String>,
    #[serde(rename = "bidNtceUrl", default, deserialize_with = "lenient_string")]
    pub detail_url: Option<String>,
}

/// Ordered rows produced wholesale by one search
pub type ResultSet = Vec<BidNotice>;

/// Accept strings, numbers or null; blank strings count as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
