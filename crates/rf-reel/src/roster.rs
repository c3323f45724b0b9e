//! Roster items and weighted rosters

use serde::{Deserialize, Serialize};

/// A weighted candidate on the reel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterItem {
    /// Unique identifier, stable across spins
    pub id: String,
    /// Display label (player nickname)
    pub label: String,
    /// Avatar/image reference
    pub avatar_url: String,
    /// Probability weight (non-negative)
    pub probability: f64,
}

impl RosterItem {
    /// Create a roster item
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        avatar_url: impl Into<String>,
        probability: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            avatar_url: avatar_url.into(),
            probability,
        }
    }
}

/// Ordered sequence of weighted candidates
///
/// The engine only ever reads a roster. Normalization belongs to whoever
/// supplies it; [`Roster::normalized`] is provided for that side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    items: Vec<RosterItem>,
}

impl Roster {
    /// Create a roster from items, keeping their weights as given
    pub fn new(items: Vec<RosterItem>) -> Self {
        Self { items }
    }

    /// Create a roster where every item gets weight `1 / len`
    pub fn uniform(mut items: Vec<RosterItem>) -> Self {
        let len = items.len();
        if len > 0 {
            let weight = 1.0 / len as f64;
            for item in &mut items {
                item.probability = weight;
            }
        }
        Self { items }
    }

    pub fn items(&self) -> &[RosterItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RosterItem> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RosterItem> {
        self.items.iter()
    }

    /// Index of the first item with this id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Sum of all weights
    pub fn weight_sum(&self) -> f64 {
        self.items.iter().map(|item| item.probability).sum()
    }

    /// Check that weights sum to 1 within `epsilon`
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        !self.items.is_empty() && (self.weight_sum() - 1.0).abs() <= epsilon
    }

    /// Copy with weights scaled to sum to 1.
    /// Negative weights count as zero; an all-zero roster becomes uniform.
    pub fn normalized(&self) -> Self {
        let total: f64 = self.items.iter().map(|item| item.probability.max(0.0)).sum();
        if total <= 0.0 || !total.is_finite() {
            return Self::uniform(self.items.clone());
        }

        let items = self
            .items
            .iter()
            .map(|item| RosterItem {
                probability: item.probability.max(0.0) / total,
                ..item.clone()
            })
            .collect();

        Self { items }
    }
}

impl From<Vec<RosterItem>> for Roster {
    fn from(items: Vec<RosterItem>) -> Self {
        Self::new(items)
    }
}

impl FromIterator<RosterItem> for Roster {
    fn from_iter<T: IntoIterator<Item = RosterItem>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a RosterItem;
    type IntoIter = std::slice::Iter<'a, RosterItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
