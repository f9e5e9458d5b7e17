//! Numeric type resolution.
//!
//! Picks the narrowest integer class covering the declared bounds, or a
//! float/double class when the field asks for one.

use std::fmt;

use tracing::warn;

use crate::accessor::Constraints;
use crate::catalog::{IntegerType, TypeCatalog};
use crate::error::Result;
use crate::plan::ColumnType;

/// Scale used for float columns.
pub const FLOAT_SCALE: u32 = 2;

/// Precision used for float columns that declare none.
pub const DEFAULT_FLOAT_PRECISION: u32 = 8;

/// Result of numeric resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// FLOAT(precision, scale).
    Float {
        /// Total digits.
        precision: u32,
        /// Digits after the decimal point.
        scale: u32,
    },
    /// An integer or double class, optionally unsigned.
    Sized {
        /// Catalog type name.
        name: &'static str,
        /// Whether ` unsigned` is appended.
        unsigned: bool,
    },
}

impl NumericType {
    /// Whether the type is unsigned.
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        matches!(self, Self::Sized { unsigned: true, .. })
    }

    /// The column constructor for this type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match *self {
            Self::Float { precision, scale } => ColumnType::Float { precision, scale },
            Self::Sized { .. } => ColumnType::SpecificType(self.to_string()),
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float { precision, scale } => write!(f, "float({precision}, {scale})"),
            Self::Sized {
                name,
                unsigned: true,
            } => write!(f, "{name} unsigned"),
            Self::Sized { name, .. } => write!(f, "{name}"),
        }
    }
}

/// The bounds a number column must cover.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveBounds {
    /// Lowest value to store.
    pub minimum: f64,
    /// Highest value to store.
    pub maximum: f64,
}

impl EffectiveBounds {
    /// Derives the bounds from a field's rules.
    ///
    /// `max` overrides `less` and `min` overrides `greater`. Missing bounds
    /// fall back to the catalog's default integer range, or to zero for the
    /// minimum of a strictly positive field.
    pub fn from_field<F: Constraints + ?Sized>(catalog: &TypeCatalog, field: &F) -> Result<Self> {
        let default = catalog.default_integer();
        let minimum = field.min()?.or(field.greater()?).unwrap_or_else(|| {
            if field.strictly_positive() {
                0.0
            } else {
                default.min as f64
            }
        });
        let maximum = field.max()?.or(field.less()?).unwrap_or(default.max as f64);
        Ok(Self { minimum, maximum })
    }

    /// True when the column never stores negative values.
    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        self.minimum >= 0.0
    }

    /// True when the minimum has the larger magnitude, so the negative side
    /// drives type selection.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_min_biggest(&self) -> bool {
        -self.minimum.abs().max(self.maximum.abs()) == self.minimum
    }

    /// First catalog entry covering the driving bound.
    #[must_use]
    pub fn fit<'c>(&self, integers: &'c [IntegerType]) -> Option<&'c IntegerType> {
        if self.is_min_biggest() {
            integers.iter().find(|t| t.min as f64 <= self.minimum)
        } else {
            integers.iter().find(|t| t.max as f64 >= self.maximum)
        }
    }
}

/// Resolves the storage type of a `number` field.
///
/// Fails only when a rule the decision depends on has a malformed value.
pub fn resolve<F: Constraints + ?Sized>(
    catalog: &TypeCatalog,
    name: &str,
    field: &F,
) -> Result<NumericType> {
    if field.float() || field.precision_set() {
        return Ok(NumericType::Float {
            precision: field.precision()?.unwrap_or(DEFAULT_FLOAT_PRECISION),
            scale: FLOAT_SCALE,
        });
    }
    if field.double() {
        return Ok(NumericType::Sized {
            name: catalog.double,
            unsigned: field.strictly_positive(),
        });
    }
    if field.port_set() {
        return Ok(NumericType::Sized {
            name: catalog.port.name,
            unsigned: true,
        });
    }

    let bounds = EffectiveBounds::from_field(catalog, field)?;
    let unsigned = bounds.is_unsigned();
    Ok(match bounds.fit(catalog.integers) {
        Some(entry) => {
            let uncovered = if bounds.is_min_biggest() {
                bounds.maximum
            } else {
                bounds.minimum
            };
            if !entry.contains(uncovered) {
                warn!(
                    field = name,
                    sql_type = entry.name,
                    bound = uncovered,
                    "Selected integer type does not cover the opposite bound"
                );
            }
            NumericType::Sized {
                name: entry.name,
                unsigned,
            }
        }
        None => NumericType::Sized {
            name: catalog.double,
            unsigned,
        },
    })
}
