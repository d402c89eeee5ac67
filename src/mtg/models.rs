use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Body of `GET /v1/cards`. Paging fields sent alongside `cards` are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CardResponse {
    pub cards: Vec<Card>,
}

/// Unused fields are omitted. Any of these may be missing upstream.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub name: Option<String>,
    pub mana_cost: Option<String>,
    #[serde(default, deserialize_with = "converted_mana_cost")]
    pub cmc: Option<u32>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub rarity: Option<String>,
    pub set: Option<String>,
    pub set_name: Option<String>,
    pub artist: Option<String>,
}

// cmc comes back as `3` or `3.0` depending on the card; half-mana cards
// from the un-sets carry `0.5` and are truncated.
fn converted_mana_cost<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(cmc) if cmc.is_finite() && cmc >= 0.0 && cmc <= f64::from(u32::MAX) => {
            Ok(Some(cmc.trunc() as u32))
        }
        Some(cmc) => Err(de::Error::custom(format!(
            "invalid converted mana cost {}",
            cmc
        ))),
    }
}
