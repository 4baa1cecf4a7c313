// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer specifiers.
//!
//! Draw calls name their stacking slot with a short string:
//!
//! ```text
//! <layer_name>[":" ("above" | "below")]
//! ```
//!
//! An empty name denotes the owner's own default position. Any other suffix
//! after a colon is part of the name. The string is parsed once into a
//! [`LayerSpec`] at the boundary and handled as a typed value afterwards.

use core::fmt;

/// A query-time nudge relative to a slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Exactly at the slot.
    #[default]
    None,
    /// Half a step above the slot.
    Above,
    /// Half a step below the slot.
    Below,
}

impl Modifier {
    /// Returns the suffix keyword, if any.
    #[must_use]
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Above => Some("above"),
            Self::Below => Some("below"),
        }
    }
}

/// A parsed layer specifier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerSpec<'a> {
    /// Bare layer name; empty for the owner's default position.
    pub name: &'a str,
    /// Optional nudge.
    pub modifier: Modifier,
}

impl<'a> LayerSpec<'a> {
    /// Creates a specifier without a modifier.
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            modifier: Modifier::None,
        }
    }

    /// Returns a copy with the given modifier.
    #[must_use]
    pub const fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    /// Parses `<name>[:above|:below]`. Never fails.
    #[must_use]
    pub fn parse(spec: &'a str) -> Self {
        let (name, modifier) = match spec.rsplit_once(':') {
            Some((name, "above")) => (name, Modifier::Above),
            Some((name, "below")) => (name, Modifier::Below),
            _ => (spec, Modifier::None),
        };
        Self { name, modifier }
    }

    /// Whether this names the owner's default position.
    #[inline]
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for LayerSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(keyword) = self.modifier.keyword() {
            write!(f, ":{keyword}")?;
        }
        Ok(())
    }
}
