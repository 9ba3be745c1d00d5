//! Animals, barns, and the colors that partition them.

use farm_id::{AnimalId, BarnId};
use serde::{Deserialize, Serialize};

/// Favorite color of an animal; the partition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Indigo,
    Violet,
}

impl Color {
    /// Every color, in declaration order.
    pub const ALL: [Color; 7] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Indigo,
        Color::Violet,
    ];

    /// Canonical storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Violet => "violet",
        }
    }

    /// Capitalized form used in barn names.
    fn label(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Indigo => "Indigo",
            Self::Violet => "Violet",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color: {0}")]
pub struct ParseColorError(pub String);

impl std::str::FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseColorError(s.to_string()))
    }
}

/// An animal waiting for, or living in, a barn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: AnimalId,
    pub name: String,
    pub favorite_color: Color,
    /// Assigned by the placement service only.
    pub barn: Option<BarnId>,
}

impl Animal {
    /// Creates an unplaced animal with a fresh ID.
    pub fn new(name: impl Into<String>, favorite_color: Color) -> Self {
        Self {
            id: AnimalId::new(),
            name: name.into(),
            favorite_color,
            barn: None,
        }
    }

    /// Returns true if the animal currently sits in `barn`.
    pub fn is_in(&self, barn: &BarnId) -> bool {
        self.barn.as_ref() == Some(barn)
    }
}

/// A barn holding animals of one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barn {
    pub id: BarnId,
    /// Human label such as `Red-3`; never used for lookup or grouping.
    pub name: String,
    pub color: Color,
}

impl Barn {
    /// Creates the barn for `color` given how many barns of that color
    /// already exist.
    pub fn for_color(color: Color, existing_barns: usize) -> Self {
        Self {
            id: BarnId::new(),
            name: format!("{}-{}", color.label(), existing_barns),
            color,
        }
    }
}
