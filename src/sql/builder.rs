//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from path and query input.
//!
//! Every identifier goes through the sanitizer, every value becomes a `$n`
//! placeholder. Nothing user-supplied is ever interpolated into the statement
//! text except through `quote_ident`.

use crate::ident::quote_ident;
use serde_json::{Map, Value};

/// Row-identity column for the `/DB/{table}/{id}` grammar.
pub const ID_COLUMN: &str = "id";

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// DESC only on case-insensitive "desc"; anything else is ASC.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Filter, sort, and pagination input for a row fetch, parsed from the query
/// string. Filter insertion order drives predicate and parameter order.
#[derive(Default)]
pub struct FetchOptions {
    pub filters: Vec<(String, String)>,
    pub sort_by: Option<String>,
    pub order: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `SELECT * FROM <t>` with optional AND-combined WHERE (id predicate first,
/// then one equality per filter), ORDER BY, LIMIT and OFFSET. Offset is only
/// applied when a limit is present; both are bound, limit before offset.
pub fn select(table: &str, id: Option<&str>, opts: &FetchOptions) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    if let Some(id) = id {
        let n = q.push_param(Value::String(id.to_string()));
        where_parts.push(format!("{} = ${}", quote_ident(ID_COLUMN), n));
    }
    for (col, val) in &opts.filters {
        let n = q.push_param(Value::String(val.clone()));
        where_parts.push(format!("{} = ${}", quote_ident(col), n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let order_clause = opts
        .sort_by
        .as_deref()
        .map(|col| format!(" ORDER BY {} {}", quote_ident(col), opts.order.as_sql()))
        .unwrap_or_default();
    let mut paging_clause = String::new();
    if let Some(limit) = opts.limit {
        let n = q.push_param(Value::Number(limit.into()));
        paging_clause.push_str(&format!(" LIMIT ${}", n));
        if let Some(offset) = opts.offset {
            let n = q.push_param(Value::Number(offset.into()));
            paging_clause.push_str(&format!(" OFFSET ${}", n));
        }
    }
    q.sql = format!(
        "SELECT * FROM {}{}{}{}",
        quote_ident(table),
        where_clause,
        order_clause,
        paging_clause
    );
    q
}

/// INSERT: column list and placeholder list come from one traversal of the
/// record map, so bound values stay aligned with their columns. Caller rejects
/// empty records before this point.
pub fn insert(table: &str, record: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    for (col, val) in record {
        let n = q.push_param(val.clone());
        cols.push(quote_ident(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        cols.join(", "),
        placeholders.join(", ")
    );
    q
}

/// UPDATE by id: SET entries from one traversal of the record map, id bound
/// last.
pub fn update(table: &str, id: &str, record: &Map<String, Value>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(record.len());
    for (col, val) in record {
        let n = q.push_param(val.clone());
        sets.push(format!("{} = ${}", quote_ident(col), n));
    }
    let id_param = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${}",
        quote_ident(table),
        sets.join(", "),
        quote_ident(ID_COLUMN),
        id_param
    );
    q
}

/// DELETE by id.
pub fn delete(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(Value::String(id.to_string()));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${}",
        quote_ident(table),
        quote_ident(ID_COLUMN),
        n
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_by_id_only() {
        let q = select("users", Some("5"), &FetchOptions::default());
        assert_eq!(q.sql, r#"SELECT * FROM "users" WHERE "id" = $1"#);
        assert_eq!(q.params, vec![json!("5")]);
    }

    #[test]
    fn select_ands_filters_in_insertion_order() {
        let opts = FetchOptions {
            filters: vec![
                ("status".into(), "active".into()),
                ("role".into(), "admin".into()),
            ],
            ..Default::default()
        };
        let q = select("users", None, &opts);
        assert_eq!(
            q.sql,
            r#"SELECT * FROM "users" WHERE "status" = $1 AND "role" = $2"#
        );
        assert_eq!(q.params, vec![json!("active"), json!("admin")]);
    }

    #[test]
    fn select_id_predicate_precedes_filters() {
        let opts = FetchOptions {
            filters: vec![("status".into(), "active".into())],
            ..Default::default()
        };
        let q = select("users", Some("7"), &opts);
        assert_eq!(
            q.sql,
            r#"SELECT * FROM "users" WHERE "id" = $1 AND "status" = $2"#
        );
        assert_eq!(q.params, vec![json!("7"), json!("active")]);
    }

    #[test]
    fn sort_defaults_to_asc() {
        let opts = FetchOptions {
            sort_by: Some("name".into()),
            ..Default::default()
        };
        let q = select("users", None, &opts);
        assert_eq!(q.sql, r#"SELECT * FROM "users" ORDER BY "name" ASC"#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn sort_desc_is_case_insensitive_and_bogus_falls_back_to_asc() {
        assert_eq!(SortOrder::parse("DeSc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("desc"), SortOrder::Desc);
        assert_eq!(SortOrder::parse("bogus"), SortOrder::Asc);
        assert_eq!(SortOrder::parse(""), SortOrder::Asc);
    }

    #[test]
    fn limit_without_offset() {
        let opts = FetchOptions {
            limit: Some(10),
            ..Default::default()
        };
        let q = select("users", None, &opts);
        assert_eq!(q.sql, r#"SELECT * FROM "users" LIMIT $1"#);
        assert_eq!(q.params, vec![json!(10)]);
    }

    #[test]
    fn offset_bound_after_limit() {
        let opts = FetchOptions {
            limit: Some(10),
            offset: Some(5),
            ..Default::default()
        };
        let q = select("users", None, &opts);
        assert_eq!(q.sql, r#"SELECT * FROM "users" LIMIT $1 OFFSET $2"#);
        assert_eq!(q.params, vec![json!(10), json!(5)]);
    }

    #[test]
    fn offset_ignored_without_limit() {
        let opts = FetchOptions {
            offset: Some(5),
            ..Default::default()
        };
        let q = select("users", None, &opts);
        assert_eq!(q.sql, r#"SELECT * FROM "users""#);
        assert!(q.params.is_empty());
    }

    #[test]
    fn insert_columns_and_params_share_one_traversal() {
        let record = match json!({"name": "ada", "age": 36, "active": true}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let q = insert("users", &record);
        // serde_json::Map iterates in a stable order; columns and params must
        // line up pairwise regardless of what that order is.
        let cols: Vec<&str> = q
            .sql
            .trim_start_matches(r#"INSERT INTO "users" ("#)
            .split(')')
            .next()
            .unwrap()
            .split(", ")
            .map(|c| c.trim_matches('"'))
            .collect();
        assert_eq!(cols.len(), 3);
        for (i, col) in cols.iter().enumerate() {
            assert_eq!(&q.params[i], record.get(*col).unwrap());
        }
        assert!(q.sql.ends_with("VALUES ($1, $2, $3)"));
    }

    #[test]
    fn insert_sanitizes_hostile_column_names() {
        let record = match json!({"name\"; DROP TABLE users--": "x"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let q = insert("users", &record);
        assert_eq!(
            q.sql,
            r#"INSERT INTO "users" ("nameDROPTABLEusers") VALUES ($1)"#
        );
    }

    #[test]
    fn update_binds_id_last() {
        let record = match json!({"name": "ada"}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let q = update("users", "5", &record);
        assert_eq!(
            q.sql,
            r#"UPDATE "users" SET "name" = $1 WHERE "id" = $2"#
        );
        assert_eq!(q.params, vec![json!("ada"), json!("5")]);
    }

    #[test]
    fn delete_by_id() {
        let q = delete("users", "5");
        assert_eq!(q.sql, r#"DELETE FROM "users" WHERE "id" = $1"#);
        assert_eq!(q.params, vec![json!("5")]);
    }
}
