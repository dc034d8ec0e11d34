use serde::{Deserialize, Serialize};

/// One image variant set as returned by the card API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CardImage {
    /// Image ID (alternate artworks share the card ID but not this one)
    #[serde(default)]
    pub id: u64,

    /// Original, full-resolution image
    #[serde(default)]
    pub image_url: Option<String>,

    /// Thumbnail used in the gallery grid
    #[serde(default)]
    pub image_url_small: Option<String>,

    /// Artwork-only crop
    #[serde(default)]
    pub image_url_cropped: Option<String>,
}

/// A single card as returned by the remote lookup API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    /// Card ID (passcode)
    #[serde(default)]
    pub id: u64,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Card type ("Normal Monster", "Spell Card", ...)
    #[serde(default, rename = "type")]
    pub card_type: String,

    /// Frame type ("normal", "effect", "spell", ...)
    #[serde(default, rename = "frameType")]
    pub frame_type: String,

    /// Card text
    #[serde(default)]
    pub desc: String,

    /// Monster race or spell/trap subtype
    #[serde(default)]
    pub race: String,

    #[serde(default)]
    pub archetype: Option<String>,

    #[serde(default)]
    pub attribute: Option<String>,

    #[serde(default)]
    pub atk: Option<i32>,

    #[serde(default)]
    pub def: Option<i32>,

    #[serde(default)]
    pub level: Option<u8>,

    /// Image variants; only the first one is displayed
    #[serde(default)]
    pub card_images: Vec<CardImage>,
}

impl CardRecord {
    /// Create a new CardRecord with required fields
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            card_type: String::new(),
            frame_type: String::new(),
            desc: String::new(),
            race: String::new(),
            archetype: None,
            attribute: None,
            atk: None,
            def: None,
            level: None,
            card_images: Vec::new(),
        }
    }

    /// Attach an image variant
    pub fn with_image(
        mut self,
        image_url: Option<&str>,
        image_url_small: Option<&str>,
    ) -> Self {
        self.card_images.push(CardImage {
            id: self.id,
            image_url: image_url.map(str::to_string),
            image_url_small: image_url_small.map(str::to_string),
            image_url_cropped: None,
        });
        self
    }

    fn primary_image(&self) -> Option<&CardImage> {
        self.card_images.first()
    }

    /// Thumbnail URL, falling back to the full-resolution image.
    /// Empty when the card has no images at all.
    pub fn small_image_url(&self) -> &str {
        self.primary_image()
            .and_then(|img| {
                img.image_url_small
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .or_else(|| img.image_url.as_deref().filter(|u| !u.is_empty()))
            })
            .unwrap_or("")
    }

    /// Full-resolution URL used for downloads, falling back to the thumbnail
    pub fn high_quality_url(&self) -> &str {
        self.primary_image()
            .and_then(|img| img.image_url.as_deref().filter(|u| !u.is_empty()))
            .unwrap_or_else(|| self.small_image_url())
    }

    /// Whether the card has anything to show in the grid
    pub fn has_image(&self) -> bool {
        !self.small_image_url().is_empty()
    }

    /// File name stem for downloads: ASCII alphanumerics and whitespace kept,
    /// whitespace runs collapsed to `_`.
    pub fn file_stem(&self) -> String {
        let kept: String = self
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
            .collect();
        kept.split_whitespace().collect::<Vec<_>>().join("_")
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        match (self.atk, self.def) {
            (Some(atk), Some(def)) => format!("{} [{}/{}]", self.name, atk, def),
            _ if !self.card_type.is_empty() => format!("{} ({})", self.name, self.card_type),
            _ => self.name.clone(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_record_creation() {
        let card = CardRecord::new(89631139, "Blue-Eyes White Dragon");
        assert_eq!(card.id, 89631139);
        assert_eq!(card.name, "Blue-Eyes White Dragon");
        assert!(!card.has_image());
        assert_eq!(card.small_image_url(), "");
        assert_eq!(card.high_quality_url(), "");
    }

    #[test]
    fn test_image_fallbacks() {
        let both = CardRecord::new(1, "A").with_image(Some("https://img/big.jpg"), Some("https://img/small.jpg"));
        assert_eq!(both.small_image_url(), "https://img/small.jpg");
        assert_eq!(both.high_quality_url(), "https://img/big.jpg");

        let big_only = CardRecord::new(2, "B").with_image(Some("https://img/big.jpg"), None);
        assert_eq!(big_only.small_image_url(), "https://img/big.jpg");
        assert_eq!(big_only.high_quality_url(), "https://img/big.jpg");

        let small_only = CardRecord::new(3, "C").with_image(None, Some("https://img/small.jpg"));
        assert_eq!(small_only.small_image_url(), "https://img/small.jpg");
        assert_eq!(small_only.high_quality_url(), "https://img/small.jpg");
    }

    #[test]
    fn test_only_first_image_is_used() {
        let card = CardRecord::new(4, "D")
            .with_image(Some("https://img/first.jpg"), None)
            .with_image(Some("https://img/second.jpg"), Some("https://img/second_s.jpg"));
        assert_eq!(card.small_image_url(), "https://img/first.jpg");
    }

    #[test]
    fn test_file_stem() {
        let card = CardRecord::new(1, "Blue-Eyes  White Dragon!");
        assert_eq!(card.file_stem(), "BlueEyes_White_Dragon");

        let card = CardRecord::new(2, "  Dark Magician  ");
        assert_eq!(card.file_stem(), "Dark_Magician");
    }

    #[test]
    fn test_deserialize_api_shape() {
        let json = r#"{
            "id": 89631139,
            "name": "Blue-Eyes White Dragon",
            "type": "Normal Monster",
            "frameType": "normal",
            "desc": "This legendary dragon...",
            "atk": 3000,
            "def": 2500,
            "level": 8,
            "race": "Dragon",
            "attribute": "LIGHT",
            "archetype": "Blue-Eyes",
            "card_images": [{
                "id": 89631139,
                "image_url": "https://images.ygoprodeck.com/images/cards/89631139.jpg",
                "image_url_small": "https://images.ygoprodeck.com/images/cards_small/89631139.jpg",
                "image_url_cropped": "https://images.ygoprodeck.com/images/cards_cropped/89631139.jpg"
            }],
            "card_prices": [{"tcgplayer_price": "0.10"}]
        }"#;

        let card = CardRecord::from_json(json).unwrap();
        assert_eq!(card.card_type, "Normal Monster");
        assert_eq!(card.frame_type, "normal");
        assert_eq!(card.level, Some(8));
        assert_eq!(card.display_name(), "Blue-Eyes White Dragon [3000/2500]");
        assert!(card.small_image_url().contains("cards_small"));
    }

    #[test]
    fn test_display_name_for_spell() {
        let mut card = CardRecord::new(1, "Pot of Greed");
        card.card_type = "Spell Card".to_string();
        assert_eq!(card.display_name(), "Pot of Greed (Spell Card)");
    }
}
