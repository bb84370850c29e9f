//! Declarative schema model.
//!
//! Schemas are closed-world values: a finite [`ColumnType`] enum instead of
//! free-form type strings, so conversion rules can match exhaustively.
//! Everything derives `serde` so schemas round-trip through YAML for the
//! CLI preview path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Snowflake's maximum VARCHAR length, used as its TEXT idiom.
pub const SNOWFLAKE_MAX_VARCHAR: u32 = 16_777_216;

/// Column type in either dialect's vocabulary.
///
/// Serialized as a plain name for unit types (`integer`, `timestamp_ntz`)
/// and as a single-entry map for parameterized ones
/// (`varchar: {length: 50}`, `decimal: {precision: 38, scale: 0}`,
/// `other: GEOGRAPHY`). See the hand-written serde impls below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Decimal { precision: u8, scale: u8 },
    Varchar { length: Option<u32> },
    /// Unbounded string, rendered as VARCHAR(16777216) in warehouse DDL.
    Text,
    Timestamp,
    /// Snowflake TIMESTAMP_NTZ (no time zone).
    TimestampNtz,
    /// Snowflake TIMESTAMP_TZ.
    TimestampTz,
    Boolean,
    /// A type the bridge has no structured knowledge of, kept verbatim.
    Other(String),
}

impl ColumnType {
    /// Coarse family of this type, used as the conversion fallback for
    /// [`ColumnType::Other`]. `None` means no family could be guessed.
    pub fn affinity(&self) -> Option<TypeAffinity> {
        match self {
            ColumnType::Integer => Some(TypeAffinity::Integer),
            ColumnType::Decimal { .. } => Some(TypeAffinity::Decimal),
            ColumnType::Varchar { .. } | ColumnType::Text => Some(TypeAffinity::String),
            ColumnType::Timestamp | ColumnType::TimestampNtz | ColumnType::TimestampTz => {
                Some(TypeAffinity::Timestamp)
            }
            ColumnType::Boolean => None,
            ColumnType::Other(name) => guess_affinity(name),
        }
    }
}

/// Guess a type family from a raw type name by substring inspection.
fn guess_affinity(name: &str) -> Option<TypeAffinity> {
    let upper = name.to_ascii_uppercase();
    if upper.contains("INT") {
        Some(TypeAffinity::Integer)
    } else if upper.contains("CHAR") || upper.contains("STRING") || upper.contains("TEXT") {
        Some(TypeAffinity::String)
    } else if upper.contains("NUMBER") || upper.contains("NUMERIC") || upper.contains("DECIMAL") {
        Some(TypeAffinity::Decimal)
    } else if upper.contains("TIMESTAMP") || upper.contains("DATE") || upper.contains("TIME") {
        Some(TypeAffinity::Timestamp)
    } else {
        None
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "INTEGER"),
            ColumnType::Decimal { precision, scale } => {
                write!(f, "DECIMAL({},{})", precision, scale)
            }
            ColumnType::Varchar { length: Some(n) } => write!(f, "VARCHAR({})", n),
            ColumnType::Varchar { length: None } => write!(f, "VARCHAR"),
            ColumnType::Text => write!(f, "VARCHAR({})", SNOWFLAKE_MAX_VARCHAR),
            ColumnType::Timestamp => write!(f, "TIMESTAMP"),
            ColumnType::TimestampNtz => write!(f, "TIMESTAMP_NTZ"),
            ColumnType::TimestampTz => write!(f, "TIMESTAMP_TZ"),
            ColumnType::Boolean => write!(f, "BOOLEAN"),
            ColumnType::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct DecimalParams {
    precision: u8,
    scale: u8,
}

#[derive(Serialize, Deserialize)]
struct VarcharParams {
    #[serde(default)]
    length: Option<u32>,
}

const TYPE_NAMES: &[&str] = &[
    "integer",
    "decimal",
    "varchar",
    "text",
    "timestamp",
    "timestamp_ntz",
    "timestamp_tz",
    "boolean",
    "other",
];

impl serde::Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        match self {
            ColumnType::Integer => serializer.serialize_str("integer"),
            ColumnType::Text => serializer.serialize_str("text"),
            ColumnType::Timestamp => serializer.serialize_str("timestamp"),
            ColumnType::TimestampNtz => serializer.serialize_str("timestamp_ntz"),
            ColumnType::TimestampTz => serializer.serialize_str("timestamp_tz"),
            ColumnType::Boolean => serializer.serialize_str("boolean"),
            ColumnType::Varchar { length: None } => serializer.serialize_str("varchar"),
            ColumnType::Varchar { length } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("varchar", &VarcharParams { length: *length })?;
                map.end()
            }
            ColumnType::Decimal { precision, scale } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(
                    "decimal",
                    &DecimalParams {
                        precision: *precision,
                        scale: *scale,
                    },
                )?;
                map.end()
            }
            ColumnType::Other(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("other", name)?;
                map.end()
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, Visitor};

        struct ColumnTypeVisitor;

        impl<'de> Visitor<'de> for ColumnTypeVisitor {
            type Value = ColumnType;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a type name or a single-entry map of type parameters")
            }

            fn visit_str<E>(self, name: &str) -> Result<ColumnType, E>
            where
                E: de::Error,
            {
                match name {
                    "integer" => Ok(ColumnType::Integer),
                    "varchar" => Ok(ColumnType::Varchar { length: None }),
                    "text" => Ok(ColumnType::Text),
                    "timestamp" => Ok(ColumnType::Timestamp),
                    "timestamp_ntz" => Ok(ColumnType::TimestampNtz),
                    "timestamp_tz" => Ok(ColumnType::TimestampTz),
                    "boolean" => Ok(ColumnType::Boolean),
                    other => Err(de::Error::unknown_variant(other, TYPE_NAMES)),
                }
            }

            fn visit_map<A>(self, mut map: A) -> Result<ColumnType, A::Error>
            where
                A: MapAccess<'de>,
            {
                let key: String = map
                    .next_key()?
                    .ok_or_else(|| de::Error::custom("type map must have one entry"))?;
                let column_type = match key.as_str() {
                    "decimal" => {
                        let params: DecimalParams = map.next_value()?;
                        ColumnType::Decimal {
                            precision: params.precision,
                            scale: params.scale,
                        }
                    }
                    "varchar" => {
                        let params: VarcharParams = map.next_value()?;
                        ColumnType::Varchar {
                            length: params.length,
                        }
                    }
                    "other" => ColumnType::Other(map.next_value()?),
                    other => return Err(de::Error::unknown_variant(other, TYPE_NAMES)),
                };
                if map.next_key::<String>()?.is_some() {
                    return Err(de::Error::custom("type map must have exactly one entry"));
                }
                Ok(column_type)
            }
        }

        deserializer.deserialize_any(ColumnTypeVisitor)
    }
}

/// Coarse type family used for fallback conversion of unknown types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeAffinity {
    Integer,
    String,
    Decimal,
    Timestamp,
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Engine-generated value sequence (Snowflake IDENTITY/AUTOINCREMENT).
    #[serde(default)]
    pub identity: bool,
    /// Server-side default expression, verbatim SQL.
    #[serde(default)]
    pub default: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Named constraint kinds the adapter knows how to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey,
    Check,
    Unique,
    Other,
}

/// A named table-level constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedConstraint {
    pub name: String,
    pub kind: ConstraintKind,
}

/// One table: ordered columns plus named constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<ColumnDescription>,
    #[serde(default)]
    pub constraints: Vec<NamedConstraint>,
}

impl TableDescription {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDescription> {
        self.columns.iter().find(|c| c.name == name)
    }
}

impl PartialEq for TableDescription {
    /// Name-keyed comparison: column and constraint order is not significant.
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name
            || self.columns.len() != other.columns.len()
            || self.constraints.len() != other.constraints.len()
        {
            return false;
        }
        self.columns
            .iter()
            .all(|c| other.column(&c.name) == Some(c))
            && self
                .constraints
                .iter()
                .all(|k| other.constraints.contains(k))
    }
}

/// A full schema: a set of tables keyed by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableDescription>,
}

impl SchemaDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table by name.
    pub fn insert(&mut self, table: TableDescription) {
        if let Some(existing) = self.tables.iter_mut().find(|t| t.name == table.name) {
            *existing = table;
        } else {
            self.tables.push(table);
        }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableDescription> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn tables(&self) -> &[TableDescription] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl PartialEq for SchemaDescription {
    /// Name-keyed comparison: table order is not significant.
    fn eq(&self, other: &Self) -> bool {
        self.tables.len() == other.tables.len()
            && self.tables.iter().all(|t| other.table(&t.name) == Some(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::Integer.to_string(), "INTEGER");
        assert_eq!(
            ColumnType::Decimal {
                precision: 10,
                scale: 2
            }
            .to_string(),
            "DECIMAL(10,2)"
        );
        assert_eq!(
            ColumnType::Varchar { length: Some(50) }.to_string(),
            "VARCHAR(50)"
        );
        assert_eq!(ColumnType::Text.to_string(), "VARCHAR(16777216)");
        assert_eq!(ColumnType::TimestampNtz.to_string(), "TIMESTAMP_NTZ");
    }

    #[test]
    fn test_affinity_guessing_for_unknown_types() {
        assert_eq!(
            ColumnType::Other("SMALLINT".into()).affinity(),
            Some(TypeAffinity::Integer)
        );
        assert_eq!(
            ColumnType::Other("NVARCHAR2".into()).affinity(),
            Some(TypeAffinity::String)
        );
        assert_eq!(
            ColumnType::Other("NUMBER".into()).affinity(),
            Some(TypeAffinity::Decimal)
        );
        assert_eq!(
            ColumnType::Other("DATETIME2".into()).affinity(),
            Some(TypeAffinity::Timestamp)
        );
        assert_eq!(ColumnType::Other("GEOGRAPHY".into()).affinity(), None);
    }

    #[test]
    fn test_schema_equality_ignores_order() {
        let col = |name: &str| ColumnDescription {
            name: name.to_string(),
            column_type: ColumnType::Integer,
            nullable: true,
            primary_key: false,
            identity: false,
            default: None,
        };
        let table = |name: &str, cols: Vec<ColumnDescription>| TableDescription {
            name: name.to_string(),
            columns: cols,
            constraints: vec![],
        };

        let a = SchemaDescription {
            tables: vec![
                table("orders", vec![col("id"), col("client_id")]),
                table("clients", vec![col("id")]),
            ],
        };
        let b = SchemaDescription {
            tables: vec![
                table("clients", vec![col("id")]),
                table("orders", vec![col("client_id"), col("id")]),
            ],
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_column_type_yaml_forms() {
        // Unit types parse from bare names.
        assert_eq!(
            serde_yaml::from_str::<ColumnType>("integer").unwrap(),
            ColumnType::Integer
        );
        assert_eq!(
            serde_yaml::from_str::<ColumnType>("varchar").unwrap(),
            ColumnType::Varchar { length: None }
        );
        // Parameterized types parse from nested maps.
        assert_eq!(
            serde_yaml::from_str::<ColumnType>("varchar:\n  length: 50").unwrap(),
            ColumnType::Varchar { length: Some(50) }
        );
        assert_eq!(
            serde_yaml::from_str::<ColumnType>("decimal:\n  precision: 38\n  scale: 0").unwrap(),
            ColumnType::Decimal {
                precision: 38,
                scale: 0
            }
        );
        assert_eq!(
            serde_yaml::from_str::<ColumnType>("other: GEOGRAPHY").unwrap(),
            ColumnType::Other("GEOGRAPHY".into())
        );
        assert!(serde_yaml::from_str::<ColumnType>("blob").is_err());
    }

    #[test]
    fn test_column_type_yaml_serialization_roundtrips() {
        for ty in [
            ColumnType::Integer,
            ColumnType::Decimal {
                precision: 10,
                scale: 2,
            },
            ColumnType::Varchar { length: Some(50) },
            ColumnType::Varchar { length: None },
            ColumnType::Text,
            ColumnType::TimestampNtz,
            ColumnType::Other("GEOGRAPHY".into()),
        ] {
            let yaml = serde_yaml::to_string(&ty).unwrap();
            let back: ColumnType = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(back, ty, "{yaml}");
        }
    }

    #[test]
    fn test_schema_yaml_roundtrip() {
        let yaml = r#"
tables:
  - name: orders
    columns:
      - name: id
        type: integer
        nullable: false
        primary_key: true
      - name: status
        type:
          varchar:
            length: 50
        default: "'pending'"
    constraints:
      - name: FK_orders_clients
        kind: foreign_key
"#;
        let schema: SchemaDescription = serde_yaml::from_str(yaml).unwrap();
        let orders = schema.table("orders").unwrap();
        assert_eq!(orders.columns.len(), 2);
        assert!(orders.column("id").unwrap().primary_key);
        assert_eq!(
            orders.column("status").unwrap().column_type,
            ColumnType::Varchar { length: Some(50) }
        );
        assert_eq!(
            orders.constraints[0].kind,
            ConstraintKind::ForeignKey
        );
    }
}
