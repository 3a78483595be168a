//! Effect descriptors - parsed, immutable effect records.
//!
//! A descriptor is what a card, tower or enemy definition file says about
//! an effect: a name, a numeric strength and a free-form argument. The
//! [`EffectRegistry`](super::EffectRegistry) turns descriptors into live
//! effects.

use serde::{Deserialize, Serialize};

/// An immutable effect record read from a data source.
///
/// ## Example
///
/// ```
/// use rust_td::effects::EffectDescriptor;
///
/// let poison = EffectDescriptor::new("poison", 5.0, "3");
/// let chance = EffectDescriptor::new("percentageChance", 25.0, "").wrapping(poison);
///
/// assert_eq!(chance.inner.as_deref().map(|d| d.name.as_str()), Some("poison"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    /// Canonical effect name, looked up in the registry.
    pub name: String,

    /// Numeric strength.
    #[serde(default)]
    pub strength: f32,

    /// Free-form argument; effects may reinterpret it as a typed value.
    #[serde(default)]
    pub argument: String,

    /// Inner effect for meta effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<EffectDescriptor>>,
}

impl EffectDescriptor {
    /// Create a new descriptor.
    pub fn new(name: impl Into<String>, strength: f32, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strength,
            argument: argument.into(),
            inner: None,
        }
    }

    /// Create a descriptor with only a name and strength.
    pub fn with_strength(name: impl Into<String>, strength: f32) -> Self {
        Self::new(name, strength, "")
    }

    /// Nest an inner descriptor (builder pattern).
    #[must_use]
    pub fn wrapping(mut self, inner: EffectDescriptor) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}
