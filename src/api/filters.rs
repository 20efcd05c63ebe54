//! Content node listing filters.

use rand::seq::SliceRandom;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect, Select,
};
use serde::Deserialize;

use crate::db::dialect::QueryDialect;
use crate::db::entities::{content_node, node_prerequisite, node_related};
use crate::error::{Result, ServerError};
use crate::query::{descendants_of, siblings_of, ContentNodeQuery};

use super::pagination::PageParams;

/// Cap on the random-sample size of the `recommendations` filter.
const RECOMMENDATION_SAMPLE: usize = 100;

/// Query parameters accepted by the content node listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContentNodeListParams {
    pub parent: Option<String>,
    pub search: Option<String>,
    pub prerequisite_for: Option<String>,
    pub has_prerequisite: Option<String>,
    pub related: Option<String>,
    pub recommendations_for: Option<String>,
    /// Presence triggers the filter; the value is ignored.
    pub recommendations: Option<String>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl ContentNodeListParams {
    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Whether any recognized filter parameter is present. Bulk destroy is
    /// refused without one.
    pub fn has_filter(&self) -> bool {
        self.parent.is_some()
            || self.search.is_some()
            || self.prerequisite_for.is_some()
            || self.has_prerequisite.is_some()
            || self.related.is_some()
            || self.recommendations_for.is_some()
            || self.recommendations.is_some()
    }

    /// Apply every present filter to the select.
    pub async fn apply<C: ConnectionTrait>(
        &self,
        db: &C,
        dialect: &dyn QueryDialect,
        mut select: Select<content_node::Entity>,
    ) -> Result<Select<content_node::Entity>> {
        if let Some(parent) = &self.parent {
            select = select.filter(content_node::Column::ParentId.eq(parent.as_str()));
        }
        if let Some(term) = &self.search {
            select = select.filter(title_description_match(term));
        }
        if let Some(node_id) = &self.prerequisite_for {
            // Prerequisites of the given node.
            let sub = Query::select()
                .column(node_prerequisite::Column::PrerequisiteId)
                .from(node_prerequisite::Entity)
                .and_where(Expr::col(node_prerequisite::Column::NodeId).eq(node_id.as_str()))
                .to_owned();
            select = select.filter(content_node::Column::Id.in_subquery(sub));
        }
        if let Some(node_id) = &self.has_prerequisite {
            // Nodes that list the given node as a prerequisite.
            let sub = Query::select()
                .column(node_prerequisite::Column::NodeId)
                .from(node_prerequisite::Entity)
                .and_where(
                    Expr::col(node_prerequisite::Column::PrerequisiteId).eq(node_id.as_str()),
                )
                .to_owned();
            select = select.filter(content_node::Column::Id.in_subquery(sub));
        }
        if let Some(node_id) = &self.related {
            // Related edges may be stored in either direction.
            let forward = Query::select()
                .column(node_related::Column::RelatedId)
                .from(node_related::Entity)
                .and_where(Expr::col(node_related::Column::NodeId).eq(node_id.as_str()))
                .to_owned();
            let backward = Query::select()
                .column(node_related::Column::NodeId)
                .from(node_related::Entity)
                .and_where(Expr::col(node_related::Column::RelatedId).eq(node_id.as_str()))
                .to_owned();
            select = select.filter(
                Condition::any()
                    .add(content_node::Column::Id.in_subquery(forward))
                    .add(content_node::Column::Id.in_subquery(backward)),
            );
        }
        if let Some(node_id) = &self.recommendations_for {
            let node = content_node::Entity::find_by_id(node_id.clone())
                .one(db)
                .await?
                .ok_or_else(|| ServerError::NodeNotFound(node_id.clone()))?;
            // Union of the node's descendants and its siblings; one OR'd
            // predicate keeps set semantics.
            select = select.filter(
                Condition::any()
                    .add(descendants_of(&node))
                    .add(siblings_of(&node)),
            );
        }
        if self.recommendations.is_some() {
            select = sample_recommendations(db, dialect, select).await?;
        }
        Ok(select)
    }
}

/// Case-insensitive substring match over title or description. LOWER + LIKE
/// behaves the same on both backends, unlike bare LIKE. `%` and `_` in the
/// term are escaped; the term is always a literal substring, never a
/// pattern.
fn title_description_match(term: &str) -> Condition {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
        .to_lowercase();
    let pattern = format!("%{}%", escaped);
    Condition::any()
        .add(
            Expr::expr(Func::lower(Expr::col(content_node::Column::Title)))
                .like(LikeExpr::new(pattern.clone()).escape('\\')),
        )
        .add(
            Expr::expr(Func::lower(Expr::col(content_node::Column::Description)))
                .like(LikeExpr::new(pattern).escape('\\')),
        )
}

/// Uniform random sample, without replacement, of up to
/// [`RECOMMENDATION_SAMPLE`] distinct content_ids from the candidate pool.
/// Placeholder ranking policy; the sample is the contract.
async fn sample_recommendations<C: ConnectionTrait>(
    db: &C,
    dialect: &dyn QueryDialect,
    select: Select<content_node::Entity>,
) -> Result<Select<content_node::Entity>> {
    let pool: Vec<String> = select
        .clone()
        .select_only()
        .column(content_node::Column::ContentId)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let amount = pool.len().min(RECOMMENDATION_SAMPLE);
    let sampled: Vec<String> = pool
        .choose_multiple(&mut rand::thread_rng(), amount)
        .cloned()
        .collect();
    // Ids were just read back from the database, no validation pass needed.
    Ok(select.filter_by_content_ids(dialect, &sampled, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::dialect::SqliteDialect;
    use crate::presets::content_kinds;
    use crate::testing::{hex_id, node_row, test_db};
    use sea_orm::{ActiveModelTrait, Set};
    use std::collections::HashSet;

    fn params() -> ContentNodeListParams {
        ContentNodeListParams::default()
    }

    #[tokio::test]
    async fn test_search_matches_title_or_description_case_insensitive() {
        let db = test_db().await;
        node_row("Intro to Algebra", content_kinds::VIDEO, 1, 1, 2)
            .insert(&db)
            .await
            .unwrap();
        let mut row = node_row("Geometry", content_kinds::VIDEO, 1, 3, 4);
        row.description = Set(Some("covers basic ALGEBRA too".to_string()));
        row.insert(&db).await.unwrap();
        node_row("Chemistry", content_kinds::VIDEO, 1, 5, 6)
            .insert(&db)
            .await
            .unwrap();

        let mut search = params();
        search.search = Some("algebra".to_string());
        let select = search
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap();
        let titles: HashSet<String> = select
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(
            titles,
            HashSet::from(["Intro to Algebra".to_string(), "Geometry".to_string()])
        );
    }

    #[tokio::test]
    async fn test_search_treats_like_wildcards_as_literals() {
        let db = test_db().await;
        node_row("Chemistry", content_kinds::VIDEO, 1, 1, 2)
            .insert(&db)
            .await
            .unwrap();
        node_row("100% Effort", content_kinds::VIDEO, 1, 3, 4)
            .insert(&db)
            .await
            .unwrap();
        node_row("snake_case", content_kinds::VIDEO, 1, 5, 6)
            .insert(&db)
            .await
            .unwrap();

        for (term, expected) in [("%", "100% Effort"), ("_", "snake_case")] {
            let mut search = params();
            search.search = Some(term.to_string());
            let found = search
                .apply(&db, &SqliteDialect, content_node::Entity::find())
                .await
                .unwrap()
                .all(&db)
                .await
                .unwrap();
            assert_eq!(found.len(), 1, "term {:?} matched {:?}", term, found);
            assert_eq!(found[0].title, expected);
        }
    }

    #[tokio::test]
    async fn test_recommendations_for_is_descendant_sibling_union() {
        let db = test_db().await;
        let root = node_row("root", content_kinds::TOPIC, 1, 1, 12).insert(&db).await.unwrap();
        let mut row = node_row("target", content_kinds::TOPIC, 1, 2, 7);
        row.parent_id = Set(Some(root.id.clone()));
        let target = row.insert(&db).await.unwrap();
        let mut row = node_row("child_a", content_kinds::VIDEO, 1, 3, 4);
        row.parent_id = Set(Some(target.id.clone()));
        row.insert(&db).await.unwrap();
        let mut row = node_row("child_b", content_kinds::VIDEO, 1, 5, 6);
        row.parent_id = Set(Some(target.id.clone()));
        row.insert(&db).await.unwrap();
        let mut row = node_row("sibling", content_kinds::VIDEO, 1, 8, 9);
        row.parent_id = Set(Some(root.id.clone()));
        row.insert(&db).await.unwrap();

        let mut recc = params();
        recc.recommendations_for = Some(target.id.clone());
        let select = recc
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap();
        let results = select.all(&db).await.unwrap();

        let ids: Vec<&str> = results.iter().map(|n| n.title.as_str()).collect();
        let unique: HashSet<&&str> = ids.iter().collect();
        assert_eq!(ids.len(), unique.len(), "duplicates in {:?}", ids);
        let titles: HashSet<&str> = ids.into_iter().collect();
        assert_eq!(titles, HashSet::from(["child_a", "child_b", "sibling"]));
    }

    #[tokio::test]
    async fn test_recommendations_for_unknown_node_is_not_found() {
        let db = test_db().await;
        let mut recc = params();
        recc.recommendations_for = Some(hex_id());
        let err = recc
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::NodeNotFound(_)));
    }

    #[tokio::test]
    async fn test_recommendations_small_pool_returns_whole_pool() {
        let db = test_db().await;
        for i in 0..10 {
            node_row("n", content_kinds::VIDEO, 1, i * 2 + 1, i * 2 + 2)
                .insert(&db)
                .await
                .unwrap();
        }

        let mut recc = params();
        recc.recommendations = Some(String::new());
        let select = recc
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap();
        assert_eq!(select.all(&db).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_recommendations_large_pool_caps_at_100() {
        let db = test_db().await;
        let rows: Vec<_> = (0..250i64)
            .map(|i| node_row("n", content_kinds::VIDEO, 1, i * 2 + 1, i * 2 + 2))
            .collect();
        content_node::Entity::insert_many(rows).exec(&db).await.unwrap();
        let pool: HashSet<String> = content_node::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.content_id)
            .collect();

        let mut recc = params();
        recc.recommendations = Some(String::new());
        let select = recc
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap();
        let sampled: HashSet<String> = select
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.content_id)
            .collect();
        assert_eq!(sampled.len(), 100);
        assert!(sampled.is_subset(&pool));
    }

    #[tokio::test]
    async fn test_prerequisite_and_related_filters() {
        let db = test_db().await;
        let lesson = node_row("lesson", content_kinds::VIDEO, 1, 1, 2).insert(&db).await.unwrap();
        let basics = node_row("basics", content_kinds::VIDEO, 1, 3, 4).insert(&db).await.unwrap();
        let extra = node_row("extra", content_kinds::VIDEO, 1, 5, 6).insert(&db).await.unwrap();

        node_prerequisite::ActiveModel {
            node_id: Set(lesson.id.clone()),
            prerequisite_id: Set(basics.id.clone()),
        }
        .insert(&db)
        .await
        .unwrap();
        node_related::ActiveModel {
            node_id: Set(lesson.id.clone()),
            related_id: Set(extra.id.clone()),
        }
        .insert(&db)
        .await
        .unwrap();

        // Prerequisites of `lesson`.
        let mut by = params();
        by.prerequisite_for = Some(lesson.id.clone());
        let found = by
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap()
            .all(&db)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "basics");

        // Nodes that require `basics`.
        let mut by = params();
        by.has_prerequisite = Some(basics.id.clone());
        let found = by
            .apply(&db, &SqliteDialect, content_node::Entity::find())
            .await
            .unwrap()
            .all(&db)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "lesson");

        // Related is symmetric regardless of stored direction.
        for node_id in [&lesson.id, &extra.id] {
            let mut by = params();
            by.related = Some(node_id.clone());
            let found = by
                .apply(&db, &SqliteDialect, content_node::Entity::find())
                .await
                .unwrap()
                .all(&db)
                .await
                .unwrap();
            assert_eq!(found.len(), 1, "related lookup for {}", node_id);
        }
    }
}
