//! Per-backend query capabilities.
//!
//! The places where SQLite and PostgreSQL need different SQL are collected
//! behind one trait, selected once at startup from the live connection's
//! backend instead of branching at every call site.

use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, DbBackend, QueryFilter, QueryOrder, QuerySelect, Select};
use uuid::Uuid;

use super::entities::content_node;

pub trait QueryDialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build a raw inclusion/exclusion predicate over pre-validated UUIDs.
    ///
    /// The ids are embedded as quoted literals rather than bound parameters
    /// so that arbitrarily large id sets stay under SQLite's
    /// SQLITE_MAX_VARIABLE_NUMBER ceiling. Callers must only pass values
    /// that have already parsed as UUIDs; nothing else may reach this
    /// clause.
    ///
    /// Id columns are 32-char hex TEXT on every backend, so the literals
    /// are plain strings - a `::uuid` cast would fail to compare against
    /// a text column on PostgreSQL.
    fn membership_clause(&self, table: &str, column: &str, ids: &[Uuid], include: bool) -> String {
        let quoted = ids.iter().map(|id| format!("'{}'", id.simple())).collect();
        in_clause(table, column, quoted, include)
    }

    /// Restrict a content node query to one row per distinct `content_id`.
    ///
    /// Which row represents a duplicate group is unspecified but
    /// deterministic for a given backend. On PostgreSQL this uses
    /// `DISTINCT ON`, which requires `content_id` to lead the ordering, so
    /// apply this before any caller-facing ordering.
    fn dedupe_by_content_id(&self, select: Select<content_node::Entity>) -> Select<content_node::Entity>;
}

pub struct SqliteDialect;

pub struct PostgresDialect;

/// Pick the dialect for a live connection's backend. MySQL is not a
/// supported target; the SQLite strategies are the portable fallback.
pub fn dialect_for(backend: DbBackend) -> &'static dyn QueryDialect {
    match backend {
        DbBackend::Postgres => &PostgresDialect,
        _ => &SqliteDialect,
    }
}

fn in_clause(table: &str, column: &str, quoted: Vec<String>, include: bool) -> String {
    if quoted.is_empty() {
        // `IN ()` is not valid SQL; an empty set matches nothing.
        return if include { "1 = 0".to_string() } else { "1 = 1".to_string() };
    }
    let op = if include { "IN" } else { "NOT IN" };
    format!("\"{}\".\"{}\" {} ({})", table, column, op, quoted.join(","))
}

impl QueryDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn dedupe_by_content_id(&self, select: Select<content_node::Entity>) -> Select<content_node::Entity> {
        // SQLite has no DISTINCT ON; keep the minimum primary key of each
        // duplicate group via a grouped subquery.
        let min_ids = Query::select()
            .expr(content_node::Column::Id.min())
            .from(content_node::Entity)
            .group_by_col(content_node::Column::ContentId)
            .to_owned();
        select.filter(content_node::Column::Id.in_subquery(min_ids))
    }
}

impl QueryDialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn dedupe_by_content_id(&self, select: Select<content_node::Entity>) -> Select<content_node::Entity> {
        select
            .distinct_on([content_node::Column::ContentId])
            .order_by_asc(content_node::Column::ContentId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<Uuid> {
        raw.iter().map(|s| Uuid::parse_str(s).unwrap()).collect()
    }

    #[test]
    fn test_membership_clause_inclusion() {
        let parsed = ids(&["2a5fa4a3e82b4c5485ee1a9b2e33a4f2"]);
        let clause = SqliteDialect.membership_clause("content_node", "content_id", &parsed, true);
        assert_eq!(
            clause,
            "\"content_node\".\"content_id\" IN ('2a5fa4a3e82b4c5485ee1a9b2e33a4f2')"
        );
    }

    // Id columns are TEXT on postgres as well; the literals must stay in
    // the stored hex format with no uuid cast.
    #[test]
    fn test_postgres_literals_match_stored_text_format() {
        let parsed = ids(&["2a5fa4a3e82b4c5485ee1a9b2e33a4f2"]);
        let clause = PostgresDialect.membership_clause("content_node", "id", &parsed, false);
        assert_eq!(
            clause,
            "\"content_node\".\"id\" NOT IN ('2a5fa4a3e82b4c5485ee1a9b2e33a4f2')"
        );
    }

    #[test]
    fn test_empty_id_set() {
        assert_eq!(SqliteDialect.membership_clause("t", "c", &[], true), "1 = 0");
        assert_eq!(SqliteDialect.membership_clause("t", "c", &[], false), "1 = 1");
    }

    #[test]
    fn test_dialect_selection() {
        assert_eq!(dialect_for(DbBackend::Sqlite).name(), "sqlite");
        assert_eq!(dialect_for(DbBackend::Postgres).name(), "postgres");
    }
}
