//! Packaging decorators.
//!
//! Packaging is a closed set of variants. `Box` and `Bag` may carry one
//! wrapped packaging (typically film) whose weight check and cost apply first;
//! `Film` is a leaf.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PackagingError, ParseError};

/// The packaging variants a courier can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackagingKind {
    Box,
    Bag,
    Film,
}

impl PackagingKind {
    /// Heaviest order this packaging can hold. `None` means no limit.
    pub fn weight_limit(&self) -> Option<u32> {
        match self {
            PackagingKind::Box => Some(30),
            PackagingKind::Bag => Some(10),
            PackagingKind::Film => None,
        }
    }

    /// Cost added to the order by this packaging.
    pub fn cost(&self) -> u32 {
        match self {
            PackagingKind::Box => 20,
            PackagingKind::Bag => 5,
            PackagingKind::Film => 1,
        }
    }

    /// Returns true if this packaging can carry a wrap.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, PackagingKind::Box | PackagingKind::Bag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PackagingKind::Box => "box",
            PackagingKind::Bag => "bag",
            PackagingKind::Film => "film",
        }
    }
}

impl std::fmt::Display for PackagingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PackagingKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" => Ok(PackagingKind::Box),
            "bag" => Ok(PackagingKind::Bag),
            "film" => Ok(PackagingKind::Film),
            _ => Err(ParseError::new("packaging", s)),
        }
    }
}

/// A packaging choice, possibly wrapping one more packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packaging {
    Box { wrapped: Option<Box<Packaging>> },
    Bag { wrapped: Option<Box<Packaging>> },
    Film,
}

impl Packaging {
    /// Creates an unwrapped packaging of the given kind.
    pub fn new(kind: PackagingKind) -> Self {
        match kind {
            PackagingKind::Box => Packaging::Box { wrapped: None },
            PackagingKind::Bag => Packaging::Bag { wrapped: None },
            PackagingKind::Film => Packaging::Film,
        }
    }

    pub fn kind(&self) -> PackagingKind {
        match self {
            Packaging::Box { .. } => PackagingKind::Box,
            Packaging::Bag { .. } => PackagingKind::Bag,
            Packaging::Film => PackagingKind::Film,
        }
    }

    /// The packaging carried inside this one, if any.
    pub fn wrapped(&self) -> Option<&Packaging> {
        match self {
            Packaging::Box { wrapped } | Packaging::Bag { wrapped } => wrapped.as_deref(),
            Packaging::Film => None,
        }
    }

    /// Wraps `inner` into this packaging.
    pub fn wrap(self, inner: Packaging) -> Result<Self, PackagingError> {
        let kind = self.kind();
        match self {
            Packaging::Box { wrapped: None } => Ok(Packaging::Box {
                wrapped: Some(Box::new(inner)),
            }),
            Packaging::Bag { wrapped: None } => Ok(Packaging::Bag {
                wrapped: Some(Box::new(inner)),
            }),
            Packaging::Box { .. } | Packaging::Bag { .. } => {
                Err(PackagingError::AlreadyWrapped(kind.as_str()))
            }
            Packaging::Film => Err(PackagingError::WrapNotSupported(kind.as_str())),
        }
    }

    /// Checks `weight` against every layer, innermost first, and returns
    /// `cost` plus the cost of every layer.
    pub fn apply(&self, weight: u32, cost: u32) -> Result<u32, PackagingError> {
        let cost = match self.wrapped() {
            Some(inner) => inner.apply(weight, cost)?,
            None => cost,
        };

        let kind = self.kind();
        if let Some(limit) = kind.weight_limit()
            && weight > limit
        {
            return Err(PackagingError::WeightLimitExceeded { limit, weight });
        }

        cost.checked_add(kind.cost())
            .ok_or(PackagingError::CostOverflow)
    }
}

/// Resolves the packaging requested for a new order.
///
/// With `add_film` set, film is wrapped into the primary packaging, which must
/// exist and must be able to carry a wrap.
pub fn resolve_packaging(
    primary: Option<PackagingKind>,
    add_film: bool,
) -> Result<Option<Packaging>, PackagingError> {
    let primary = primary.map(Packaging::new);
    if !add_film {
        return Ok(primary);
    }

    match primary {
        Some(packaging) => packaging.wrap(Packaging::Film).map(Some),
        None => Err(PackagingError::NoPrimaryPackaging),
    }
}
