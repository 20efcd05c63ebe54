//! Opt-in page-number pagination.
//!
//! Pagination is off unless the caller supplies `page_size`; without it a
//! listing returns every matching record. `?page_size=20&page=1` returns the
//! first 20.

use sea_orm::{ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub total_pages: u64,
    pub page: u64,
    pub results: Vec<T>,
}

pub async fn paginate<E, C>(
    select: Select<E>,
    db: &C,
    params: PageParams,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
    C: ConnectionTrait,
{
    match params.page_size {
        // page_size=0 is treated the same as absent: unbounded.
        None | Some(0) => {
            let results = select.all(db).await?;
            Ok(Page {
                count: results.len() as u64,
                total_pages: 1,
                page: 1,
                results,
            })
        }
        Some(page_size) => {
            let paginator = select.paginate(db, page_size);
            let count = paginator.num_items().await?;
            let total_pages = paginator.num_pages().await?;
            let page = params.page.unwrap_or(1).max(1);
            let results = paginator.fetch_page(page - 1).await?;
            Ok(Page {
                count,
                total_pages,
                page,
                results,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::local_file;
    use crate::testing::{hex_id, local_file_row, test_db};
    use sea_orm::ActiveModelTrait;

    #[tokio::test]
    async fn test_default_is_unbounded() {
        let db = test_db().await;
        for _ in 0..25 {
            local_file_row(&hex_id()).insert(&db).await.unwrap();
        }

        let page = paginate(local_file::Entity::find(), &db, PageParams::default())
            .await
            .unwrap();
        assert_eq!(page.results.len(), 25);
        assert_eq!(page.count, 25);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_page_size_limits_results() {
        let db = test_db().await;
        for _ in 0..25 {
            local_file_row(&hex_id()).insert(&db).await.unwrap();
        }

        let params = PageParams {
            page: Some(1),
            page_size: Some(20),
        };
        let page = paginate(local_file::Entity::find(), &db, params).await.unwrap();
        assert_eq!(page.results.len(), 20);
        assert_eq!(page.count, 25);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.page, 1);

        let params = PageParams {
            page: Some(2),
            page_size: Some(20),
        };
        let page = paginate(local_file::Entity::find(), &db, params).await.unwrap();
        assert_eq!(page.results.len(), 5);
    }
}
