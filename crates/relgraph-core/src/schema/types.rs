//! Column type tags and the mapped (target-language) types derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// JDBC-style type tag reported by the metadata extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JdbcType {
    Bit,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    LongVarchar,
    NChar,
    NVarchar,
    Clob,
    Date,
    Time,
    Timestamp,
    #[serde(rename = "TIMESTAMP_WITH_TIMEZONE")]
    TimestampWithTimezone,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Other,
}

impl JdbcType {
    /// Check if this tag denotes a numeric column.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            JdbcType::TinyInt
                | JdbcType::SmallInt
                | JdbcType::Integer
                | JdbcType::BigInt
                | JdbcType::Real
                | JdbcType::Float
                | JdbcType::Double
                | JdbcType::Numeric
                | JdbcType::Decimal
        )
    }

    /// Check if this tag denotes a date or time column.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            JdbcType::Date | JdbcType::Time | JdbcType::Timestamp | JdbcType::TimestampWithTimezone
        )
    }

    /// Mapped type used when no configured mapping matches.
    pub fn default_mapped_type(&self, size: u32, decimal_digits: u32) -> MappedType {
        match self {
            JdbcType::Bit | JdbcType::Boolean => MappedType::Boolean,
            JdbcType::TinyInt => MappedType::Byte,
            JdbcType::SmallInt => MappedType::Short,
            JdbcType::Integer => MappedType::Integer,
            JdbcType::BigInt => MappedType::Long,
            JdbcType::Real => MappedType::Float,
            JdbcType::Float | JdbcType::Double => MappedType::Double,
            JdbcType::Numeric | JdbcType::Decimal => match (decimal_digits, size) {
                (0, 1..=9) => MappedType::Integer,
                (0, 10..=18) => MappedType::Long,
                (0, _) => MappedType::BigInteger,
                _ => MappedType::BigDecimal,
            },
            JdbcType::Char if size == 1 => MappedType::Character,
            JdbcType::Char
            | JdbcType::Varchar
            | JdbcType::LongVarchar
            | JdbcType::NChar
            | JdbcType::NVarchar
            | JdbcType::Clob => MappedType::String,
            JdbcType::Date => MappedType::LocalDate,
            JdbcType::Time => MappedType::LocalTime,
            JdbcType::Timestamp => MappedType::LocalDateTime,
            JdbcType::TimestampWithTimezone => MappedType::OffsetDateTime,
            JdbcType::Binary | JdbcType::VarBinary | JdbcType::LongVarBinary | JdbcType::Blob => {
                MappedType::ByteArray
            }
            JdbcType::Other => MappedType::Object,
        }
    }
}

/// Target-language type an attribute is mapped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappedType {
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    Character,
    String,
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetDateTime,
    ByteArray,
    Object,
    /// A generated enumeration, by type name.
    Enum(String),
}

impl MappedType {
    /// Check if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            MappedType::Byte
                | MappedType::Short
                | MappedType::Integer
                | MappedType::Long
                | MappedType::BigInteger
                | MappedType::Float
                | MappedType::Double
                | MappedType::BigDecimal
        )
    }

    /// Check if a column of this type can carry an optimistic-locking version.
    pub fn is_versionable(&self) -> bool {
        matches!(
            self,
            MappedType::Short
                | MappedType::Integer
                | MappedType::Long
                | MappedType::LocalDateTime
                | MappedType::OffsetDateTime
        )
    }

    /// Check if this is a generated enumeration.
    pub fn is_enum(&self) -> bool {
        matches!(self, MappedType::Enum(_))
    }
}

impl fmt::Display for MappedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappedType::Boolean => write!(f, "Boolean"),
            MappedType::Byte => write!(f, "Byte"),
            MappedType::Short => write!(f, "Short"),
            MappedType::Integer => write!(f, "Integer"),
            MappedType::Long => write!(f, "Long"),
            MappedType::BigInteger => write!(f, "BigInteger"),
            MappedType::Float => write!(f, "Float"),
            MappedType::Double => write!(f, "Double"),
            MappedType::BigDecimal => write!(f, "BigDecimal"),
            MappedType::Character => write!(f, "Character"),
            MappedType::String => write!(f, "String"),
            MappedType::LocalDate => write!(f, "LocalDate"),
            MappedType::LocalTime => write!(f, "LocalTime"),
            MappedType::LocalDateTime => write!(f, "LocalDateTime"),
            MappedType::OffsetDateTime => write!(f, "OffsetDateTime"),
            MappedType::ByteArray => write!(f, "byte[]"),
            MappedType::Object => write!(f, "Object"),
            MappedType::Enum(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_defaults() {
        assert_eq!(JdbcType::Numeric.default_mapped_type(5, 0), MappedType::Integer);
        assert_eq!(JdbcType::Numeric.default_mapped_type(12, 0), MappedType::Long);
        assert_eq!(JdbcType::Numeric.default_mapped_type(38, 0), MappedType::BigInteger);
        assert_eq!(JdbcType::Decimal.default_mapped_type(10, 2), MappedType::BigDecimal);
        assert_eq!(JdbcType::BigInt.default_mapped_type(19, 0), MappedType::Long);
    }

    #[test]
    fn test_char_defaults() {
        assert_eq!(JdbcType::Char.default_mapped_type(1, 0), MappedType::Character);
        assert_eq!(JdbcType::Char.default_mapped_type(3, 0), MappedType::String);
        assert_eq!(JdbcType::Clob.default_mapped_type(0, 0), MappedType::String);
    }

    #[test]
    fn test_type_checks() {
        assert!(JdbcType::Decimal.is_numeric());
        assert!(!JdbcType::Varchar.is_numeric());
        assert!(JdbcType::Timestamp.is_temporal());

        assert!(MappedType::Long.is_versionable());
        assert!(!MappedType::String.is_versionable());
        assert!(MappedType::Enum("Status".into()).is_enum());
        assert_eq!(MappedType::ByteArray.to_string(), "byte[]");
    }

    #[test]
    fn test_jdbc_type_tags() {
        let tag: JdbcType = serde_json::from_str("\"VARCHAR\"").unwrap();
        assert_eq!(tag, JdbcType::Varchar);
        let tag: JdbcType = serde_json::from_str("\"TIMESTAMP_WITH_TIMEZONE\"").unwrap();
        assert_eq!(tag, JdbcType::TimestampWithTimezone);
        let tag: JdbcType = serde_json::from_str("\"BIGINT\"").unwrap();
        assert_eq!(tag, JdbcType::BigInt);
    }
}
