#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Record and table types for the card catalog.
//!
//! [`CatalogRecord`] is the persisted unit written to the record cache.
//! [`TableMatrix`] is the per-page intermediate form that every table on a
//! rendered card page is reduced to before individual fields are resolved.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// Identifier (absolute URL) of one catalog item.
pub type ItemReference = String;

/// A fully extracted card record.
///
/// `link` is the unique key within the record cache. Every other field
/// besides `name` is absent when the card does not carry it (spells have no
/// `level`, Link monsters have no `defense`, and so on).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub name: String,
    pub link: ItemReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monster_card_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_rating: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_arrows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pendulum_scale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Earliest printing date found in the card's release tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl CatalogRecord {
    /// Creates a record with only the mandatory fields populated.
    #[must_use]
    pub fn new(name: impl Into<String>, link: impl Into<ItemReference>) -> Self {
        Self {
            name: name.into(),
            link: link.into(),
            ..Self::default()
        }
    }
}

/// One `<table>` from a rendered page, flattened to text.
///
/// `header` holds the text of every header cell in the table. `data` holds
/// one entry per table row with the text of that row's data cells, and
/// `row_labels` holds the text of each row's leading header cell (if it has
/// one), index-aligned with `data`. Rows are not checked against the header
/// width; ragged rows are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMatrix {
    pub header: Vec<String>,
    pub data: Vec<Vec<String>>,
    #[serde(default)]
    pub row_labels: Vec<Option<String>>,
}

impl TableMatrix {
    /// Iterates `(label, cells)` pairs for every row.
    pub fn labeled_rows(&self) -> impl Iterator<Item = (Option<&str>, &[String])> {
        self.data.iter().enumerate().map(|(i, row)| {
            let label = self.row_labels.get(i).and_then(Option::as_deref);
            (label, row.as_slice())
        })
    }

    /// Returns the indices of every header cell whose text contains `needle`.
    #[must_use]
    pub fn columns_containing(&self, needle: &str) -> Vec<usize> {
        self.header
            .iter()
            .enumerate()
            .filter(|(_, h)| h.contains(needle))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Row labels of the card infobox that are read into record fields.
///
/// The string form of each variant is the exact label text on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr)]
pub enum FieldLabel {
    #[strum(serialize = "Card type")]
    CardType,
    #[strum(serialize = "Attribute")]
    Attribute,
    #[strum(serialize = "Types")]
    Types,
    #[strum(serialize = "Level")]
    Level,
    #[strum(serialize = "Rank")]
    Rank,
    #[strum(serialize = "ATK / DEF")]
    AttackDefense,
    #[strum(serialize = "ATK / LINK")]
    AttackLink,
    #[strum(serialize = "Link Arrows")]
    LinkArrows,
    #[strum(serialize = "Pendulum Scale")]
    PendulumScale,
    #[strum(serialize = "Password")]
    Password,
    #[strum(serialize = "Property")]
    Property,
}
