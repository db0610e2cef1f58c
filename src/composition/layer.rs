//! Layer and trait records as supplied by a project document

use crate::alignment::canvas::Rect;
use crate::alignment::snap::Category;
use crate::io::configuration::DEFAULT_RARITY;
use serde::{Deserialize, Deserializer, Serialize};

/// Which edges of a trait image are meant to connect to neighbors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchors {
    /// Connects upward
    #[serde(default)]
    pub top: bool,
    /// Connects downward
    #[serde(default)]
    pub bottom: bool,
    /// Connects to the left
    #[serde(default)]
    pub left: bool,
    /// Connects to the right
    #[serde(default)]
    pub right: bool,
}

/// One selectable option within a layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trait {
    /// Display name
    pub name: String,
    /// Rarity on a 0..100 scale; non-numeric input is read as absent
    #[serde(
        default,
        deserialize_with = "lenient_rarity",
        skip_serializing_if = "Option::is_none"
    )]
    pub rarity: Option<f64>,
    /// Reference to the trait image (URL, path or asset key)
    #[serde(default, alias = "imageUrl", alias = "image_url")]
    pub image: String,
    /// Edge connection hints
    #[serde(default, alias = "anchorPoints")]
    pub anchors: Anchors,
    /// Explicit placement overriding the layer position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Rect>,
    /// Category overriding the layer category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl Trait {
    /// Create a trait with a name and rarity
    pub fn new(name: impl Into<String>, rarity: Option<f64>) -> Self {
        Self {
            name: name.into(),
            rarity,
            image: String::new(),
            anchors: Anchors::default(),
            position: None,
            category: None,
        }
    }

    /// Rarity used for scoring: the stored value, or 100 when absent
    pub fn effective_rarity(&self) -> f64 {
        self.rarity
            .filter(|rarity| rarity.is_finite())
            .unwrap_or(DEFAULT_RARITY)
    }
}

/// Named stack of traits with an optional parent layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Unique key within a run
    pub name: String,
    /// Parent layer name; empty or unknown names make this a root
    #[serde(
        default,
        alias = "parentLayerName",
        alias = "parent_layer_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<String>,
    /// Nominal placement on the logical canvas
    #[serde(default)]
    pub position: Rect,
    /// Category used when a trait does not set its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Selectable options
    #[serde(default)]
    pub traits: Vec<Trait>,
}

impl Layer {
    /// Create a root layer without traits
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            position: Rect::default(),
            category: None,
            traits: Vec::new(),
        }
    }

    /// Set the parent layer name
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the nominal position
    #[must_use]
    pub const fn with_position(mut self, position: Rect) -> Self {
        self.position = position;
        self
    }

    /// Set the layer category
    #[must_use]
    pub const fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Append a trait
    #[must_use]
    pub fn with_trait(mut self, option: Trait) -> Self {
        self.traits.push(option);
        self
    }

    /// Parent name with blank strings treated as absent
    pub fn parent_name(&self) -> Option<&str> {
        self.parent
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Layers without traits take no part in enumeration
    pub const fn has_traits(&self) -> bool {
        !self.traits.is_empty()
    }

    /// Position a trait is placed at: its override, else the layer position
    pub fn position_of(&self, option: &Trait) -> Rect {
        option.position.unwrap_or(self.position)
    }

    /// Category a trait is snapped with
    pub fn category_of(&self, option: &Trait) -> Option<Category> {
        option.category.or(self.category)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRarity {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn lenient_rarity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rarity = match RawRarity::deserialize(deserializer)? {
        RawRarity::Number(value) => Some(value),
        RawRarity::Text(text) => text.trim().parse::<f64>().ok(),
        RawRarity::Other(_ignored) => None,
    };
    Ok(rarity.filter(|value| value.is_finite()))
}
