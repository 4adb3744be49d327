//! Item - The stored entity and its payloads
//!
//! TigerStyle: Explicit payload types. A draft creates, a patch merges, a
//! filter narrows. Validation runs before any backend is invoked.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{ITEM_DESCRIPTION_CHARS_MAX, ITEM_NAME_CHARS_MAX, ITEM_NAME_CHARS_MIN};

/// Identifier assigned by a backend at creation time, unique and never
/// reused within that backend instance's lifetime.
pub type ItemId = i64;

// =============================================================================
// Validation
// =============================================================================

/// A draft or patch field violating its constraint.
///
/// Raised before the storage layer is reached; maps to a "bad input"
/// response at the transport boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Name length outside the allowed character range
    #[error("name must be {ITEM_NAME_CHARS_MIN}..={ITEM_NAME_CHARS_MAX} characters, got {0}")]
    NameLength(usize),
    /// Description longer than the allowed character count
    #[error("description must be at most {ITEM_DESCRIPTION_CHARS_MAX} characters, got {0}")]
    DescriptionLength(usize),
    /// Price not strictly positive
    #[error("price must be greater than zero, got {0}")]
    PriceNotPositive(f64),
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let chars = name.chars().count();
    if !(ITEM_NAME_CHARS_MIN..=ITEM_NAME_CHARS_MAX).contains(&chars) {
        return Err(ValidationError::NameLength(chars));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let chars = description.chars().count();
    if chars > ITEM_DESCRIPTION_CHARS_MAX {
        return Err(ValidationError::DescriptionLength(chars));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::PriceNotPositive(price))
    }
}

// =============================================================================
// Item
// =============================================================================

/// A stored item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Backend-assigned identifier; set once at creation, never changed
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Unit price, strictly positive
    pub price: f64,
}

impl Item {
    /// Materialize a validated draft under a backend-assigned id.
    #[must_use]
    pub fn from_draft(id: ItemId, draft: &ItemDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
        }
    }

    /// Merge the present fields of `patch` onto this item.
    ///
    /// Fields the patch leaves as `None` keep their stored value; the id
    /// never changes. Every backend's partial update goes through this
    /// merge (or reproduces it exactly in SQL).
    #[must_use]
    pub fn apply_patch(&self, patch: &ItemPatch) -> Self {
        Self {
            id: self.id,
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| self.description.clone()),
            price: patch.price.unwrap_or(self.price),
        }
    }
}

// =============================================================================
// Item Draft
// =============================================================================

/// Creation payload: an [`Item`] without an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    /// Display name, 3-50 characters
    pub name: String,
    /// Optional description, at most 200 characters
    pub description: Option<String>,
    /// Unit price, strictly positive
    pub price: f64,
}

impl ItemDraft {
    /// Create a draft with no description.
    #[must_use]
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
        }
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check every field constraint.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_price(self.price)
    }
}

// =============================================================================
// Item Patch
// =============================================================================

/// Update payload: every field optional, `None` meaning "keep the stored
/// value".
///
/// A stored description cannot be cleared back to absent through a patch;
/// the merge keeps it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    /// Replacement name, if present
    pub name: Option<String>,
    /// Replacement description, if present
    pub description: Option<String>,
    /// Replacement price, if present
    pub price: Option<f64>,
}

impl ItemPatch {
    /// Create an empty patch (a no-op merge).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the replacement name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the replacement price.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Check every present field against its constraint.
    ///
    /// # Errors
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

// =============================================================================
// Item Filter
// =============================================================================

/// Listing filter; supplied conditions intersect.
///
/// "Unset" is encoded as `None`. A supplied `Some(0.0)` minimum price is a
/// real filter that every stored item passes (prices are strictly
/// positive); no zero value is ever treated as a sentinel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemFilter {
    /// Case-insensitive substring the name must contain
    pub name_contains: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<f64>,
}

impl ItemFilter {
    /// Create an unconstrained filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the name to contain `needle`, case-insensitively.
    #[must_use]
    pub fn with_name_contains(mut self, needle: impl Into<String>) -> Self {
        self.name_contains = Some(needle.into());
        self
    }

    /// Require `price >= min_price`.
    #[must_use]
    pub fn with_min_price(mut self, min_price: f64) -> Self {
        self.min_price = Some(min_price);
        self
    }

    /// Whether `item` passes every supplied condition.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(needle) = &self.name_contains {
            if !item.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(min_price) = self.min_price {
            if item.price < min_price {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// Tests
// =============================================================================
