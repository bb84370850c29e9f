//! End-to-end tests over a real in-memory DuckDB database.

use std::fs;
use std::path::{Path, PathBuf};

use snowduck::adapter::ddl::create_all;
use snowduck::{
    BridgeError, ColumnDescription, ColumnType, ConstraintKind, Dialect, DuckDbQuerier,
    MetadataAdapter, NamedConstraint, Querier, SchemaDescription, TableDescription, Value,
};

fn column(name: &str, column_type: ColumnType) -> ColumnDescription {
    ColumnDescription {
        name: name.to_string(),
        column_type,
        nullable: true,
        primary_key: false,
        identity: false,
        default: None,
    }
}

/// A warehouse-flavored sales schema: surrogate keys as NUMBER(38,0)
/// identities, TIMESTAMP_NTZ dates, a 16 MB description column, and the
/// usual prefixed constraints.
fn sample_schema() -> SchemaDescription {
    let mut schema = SchemaDescription::new();

    schema.insert(TableDescription {
        name: "clients".to_string(),
        columns: vec![
            ColumnDescription {
                primary_key: true,
                identity: true,
                nullable: false,
                ..column(
                    "id",
                    ColumnType::Decimal {
                        precision: 38,
                        scale: 0,
                    },
                )
            },
            column("name", ColumnType::Varchar { length: Some(100) }),
        ],
        constraints: vec![],
    });

    schema.insert(TableDescription {
        name: "products".to_string(),
        columns: vec![
            ColumnDescription {
                primary_key: true,
                identity: true,
                nullable: false,
                ..column(
                    "id",
                    ColumnType::Decimal {
                        precision: 38,
                        scale: 0,
                    },
                )
            },
            column("name", ColumnType::Varchar { length: Some(200) }),
            column(
                "price",
                ColumnType::Decimal {
                    precision: 10,
                    scale: 2,
                },
            ),
            column("description", ColumnType::Text),
        ],
        constraints: vec![],
    });

    schema.insert(TableDescription {
        name: "orders".to_string(),
        columns: vec![
            ColumnDescription {
                primary_key: true,
                identity: true,
                nullable: false,
                ..column(
                    "id",
                    ColumnType::Decimal {
                        precision: 38,
                        scale: 0,
                    },
                )
            },
            column("client_id", ColumnType::Integer),
            ColumnDescription {
                nullable: false,
                ..column("date", ColumnType::TimestampNtz)
            },
            ColumnDescription {
                default: Some("'pending'".to_string()),
                ..column("status", ColumnType::Varchar { length: Some(50) })
            },
        ],
        constraints: vec![NamedConstraint {
            name: "FK_orders_clients".to_string(),
            kind: ConstraintKind::ForeignKey,
        }],
    });

    schema.insert(TableDescription {
        name: "order_lines".to_string(),
        columns: vec![
            ColumnDescription {
                primary_key: true,
                identity: true,
                nullable: false,
                ..column(
                    "id",
                    ColumnType::Decimal {
                        precision: 38,
                        scale: 0,
                    },
                )
            },
            column("order_id", ColumnType::Integer),
            column("product_id", ColumnType::Integer),
            column("quantity", ColumnType::Integer),
        ],
        constraints: vec![
            NamedConstraint {
                name: "FK_order_lines_orders".to_string(),
                kind: ConstraintKind::ForeignKey,
            },
            NamedConstraint {
                name: "FK_order_lines_products".to_string(),
                kind: ConstraintKind::ForeignKey,
            },
        ],
    });

    schema
}

fn querier() -> DuckDbQuerier {
    DuckDbQuerier::open_in_memory(Dialect::Snowflake, PathBuf::from("sql")).unwrap()
}

fn materialized_querier() -> DuckDbQuerier {
    let q = querier();
    let adapted = MetadataAdapter::new().adapt(&sample_schema());
    create_all(&q, &adapted).unwrap();
    q
}

#[test]
fn test_adapted_warehouse_schema_materializes_in_duckdb() {
    let q = materialized_querier();
    for table in ["clients", "products", "orders", "order_lines"] {
        let result = q
            .run_raw(&format!("SELECT COUNT(*) AS n FROM \"{table}\""))
            .unwrap();
        assert_eq!(result.value(0, "n"), Some(&Value::Int(0)), "{table}");
    }
}

#[test]
fn test_snowflake_listagg_matches_native_string_agg() {
    let q = materialized_querier();
    q.run_raw(
        "INSERT INTO \"orders\" (\"id\", \"client_id\", \"date\", \"status\") VALUES \
         (1, 1, TIMESTAMP '2024-01-01 00:00:00', 'pending'), \
         (2, 1, TIMESTAMP '2024-01-02 00:00:00', 'shipped'), \
         (3, 2, TIMESTAMP '2024-01-03 00:00:00', 'pending')",
    )
    .unwrap();

    // Authored in Snowflake, resolved through the rewrite + transpile path.
    let bridged = q
        .execute(
            "SELECT LISTAGG(DISTINCT \"status\", ', ') WITHIN GROUP (ORDER BY \"status\") AS agg FROM \"orders\"",
        )
        .unwrap();
    // Native DuckDB equivalent.
    let native = q
        .run_raw("SELECT STRING_AGG(DISTINCT \"status\", ', ') AS agg FROM \"orders\"")
        .unwrap();

    let to_set = |v: &Value| -> Vec<String> {
        let mut parts: Vec<String> = v
            .as_text()
            .unwrap()
            .split(", ")
            .map(|s| s.to_string())
            .collect();
        parts.sort();
        parts
    };
    assert_eq!(
        to_set(bridged.value(0, "agg").unwrap()),
        to_set(native.value(0, "agg").unwrap())
    );
    assert_eq!(
        to_set(bridged.value(0, "agg").unwrap()),
        vec!["pending".to_string(), "shipped".to_string()]
    );
}

#[test]
fn test_execute_from_source_reads_relative_to_sql_root() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("count.sql"), "SELECT 41 + 1 AS answer").unwrap();

    let q = DuckDbQuerier::open_in_memory(Dialect::Snowflake, dir.path().to_path_buf()).unwrap();
    let result = q.execute_from_source(Path::new("count.sql")).unwrap();
    assert_eq!(result.value(0, "answer"), Some(&Value::Int(42)));
}

#[test]
fn test_missing_source_is_reported_as_such() {
    let dir = tempfile::tempdir().unwrap();
    let q = DuckDbQuerier::open_in_memory(Dialect::Snowflake, dir.path().to_path_buf()).unwrap();
    let err = q.execute_from_source(Path::new("nope.sql")).unwrap_err();
    match err {
        BridgeError::SourceNotFound(path) => {
            assert!(path.ends_with("nope.sql"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_seed_file_populates_tables() {
    let q = materialized_querier();
    let dir = tempfile::tempdir().unwrap();
    let seed_path = dir.path().join("seed.json");
    fs::write(
        &seed_path,
        r#"{
            "clients": [
                {"id": 1, "name": "Acme"},
                {"id": 2, "name": "Globex"}
            ],
            "products": [
                {"id": 1, "name": "Widget", "price": 9.99, "description": null}
            ]
        }"#,
    )
    .unwrap();

    let inserted = snowduck::seed::load_seed_file(&q, &seed_path).unwrap();
    assert_eq!(inserted, 3);

    let clients = q
        .run_raw("SELECT \"name\" FROM \"clients\" ORDER BY \"id\"")
        .unwrap();
    assert_eq!(clients.value(0, "name"), Some(&Value::Text("Acme".into())));
    assert_eq!(clients.value(1, "name"), Some(&Value::Text("Globex".into())));
}

#[test]
fn test_dml_authored_in_snowflake_dialect_lands() {
    let q = materialized_querier();
    q.execute("INSERT INTO \"clients\" (\"id\", \"name\") VALUES (7, 'Initech')")
        .unwrap();
    let result = q
        .run_raw("SELECT \"name\" FROM \"clients\" WHERE \"id\" = 7")
        .unwrap();
    assert_eq!(result.value(0, "name"), Some(&Value::Text("Initech".into())));
}
