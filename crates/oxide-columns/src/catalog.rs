//! MySQL storage type catalog.
//!
//! Ordered, immutable tables of the storage classes the resolvers choose
//! from. Within each table entries are strictly increasing in capacity, so
//! "the first entry that covers the requirement" is the narrowest one.

/// An integer storage class with its inclusive signed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerType {
    /// SQL type name (e.g. "smallint").
    pub name: &'static str,
    /// Smallest representable value.
    pub min: i64,
    /// Largest representable value.
    pub max: i64,
}

impl IntegerType {
    /// Returns true if `value` lies within this type's signed range.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min as f64 <= value && value <= self.max as f64
    }
}

/// A character storage class with its maximum length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringClass {
    /// SQL type name (e.g. "varchar").
    pub name: &'static str,
    /// Maximum number of characters.
    pub max_length: u64,
}

const MYSQL_INTEGERS: &[IntegerType] = &[
    IntegerType {
        name: "tinyint",
        min: -128,
        max: 127,
    },
    IntegerType {
        name: "smallint",
        min: -32_768,
        max: 32_767,
    },
    IntegerType {
        name: "mediumint",
        min: -8_388_608,
        max: 8_388_607,
    },
    IntegerType {
        name: "int",
        min: -2_147_483_648,
        max: 2_147_483_647,
    },
    IntegerType {
        name: "bigint",
        min: i64::MIN,
        max: i64::MAX,
    },
];

const MYSQL_STRINGS: &[StringClass] = &[
    StringClass {
        name: "varchar",
        max_length: 255,
    },
    StringClass {
        name: "mediumtext",
        max_length: 16_777_215,
    },
    StringClass {
        name: "longtext",
        max_length: 4_294_967_295,
    },
];

/// The storage classes and thresholds of one SQL dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeCatalog {
    /// Integer classes, smallest range first.
    pub integers: &'static [IntegerType],
    /// Bounded string classes, smallest first. The first entry is the
    /// bounded character type, the rest are text classes.
    pub strings: &'static [StringClass],
    /// Index into `integers` of the type whose range supplies default bounds.
    pub default_integer: usize,
    /// Floating point fallback when no integer class fits.
    pub double: &'static str,
    /// Integer type used for network ports.
    pub port: IntegerType,
    /// Unbounded free-text class.
    pub text: &'static str,
}

impl TypeCatalog {
    /// The MySQL catalog.
    pub const MYSQL: Self = Self {
        integers: MYSQL_INTEGERS,
        strings: MYSQL_STRINGS,
        default_integer: 3,
        double: "double",
        port: MYSQL_INTEGERS[1],
        text: "text",
    };

    /// The integer type whose range provides the default bounds.
    #[must_use]
    pub fn default_integer(&self) -> &IntegerType {
        &self.integers[self.default_integer]
    }

    /// The bounded character class (the first string entry).
    #[must_use]
    pub fn bounded_string(&self) -> &StringClass {
        &self.strings[0]
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::MYSQL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_strictly_ordered() {
        let catalog = TypeCatalog::MYSQL;
        for pair in catalog.integers.windows(2) {
            assert!(pair[0].min > pair[1].min, "{:?}", pair);
            assert!(pair[0].max < pair[1].max, "{:?}", pair);
        }
        for pair in catalog.strings.windows(2) {
            assert!(pair[0].max_length < pair[1].max_length, "{:?}", pair);
        }
    }

    #[test]
    fn test_defaults() {
        let catalog = TypeCatalog::default();
        assert_eq!(catalog.default_integer().name, "int");
        assert_eq!(catalog.bounded_string().max_length, 255);
        assert_eq!(catalog.port.name, "smallint");
        // Unsigned, the port type must span 0..=65535.
        assert_eq!(catalog.port.max - catalog.port.min, 65_535);
    }
}
