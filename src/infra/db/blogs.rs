use async_trait::async_trait;
use sqlx::{QueryBuilder, types::Json};
use time::OffsetDateTime;

use crate::application::repos::{BlogsWriteRepo, CreateBlogParams, RepoError, UpdateBlogParams};
use crate::domain::entities::BlogRecord;

use super::PostgresRepositories;
use super::listing::{KeyedTable, Table};
use super::util::{map_sqlx_error, push_assignment};

const BLOG_COLUMNS: &str = "id, title, slug, content, excerpt, featured_image, author_id, \
    category, tags, meta_title, meta_description, status, published_at, created_at, updated_at";

#[derive(sqlx::FromRow)]
pub struct BlogRow {
    id: i64,
    title: String,
    slug: String,
    content: String,
    excerpt: Option<String>,
    featured_image: Option<String>,
    author_id: i64,
    category: Option<String>,
    tags: Json<Vec<String>>,
    meta_title: Option<String>,
    meta_description: Option<String>,
    status: i16,
    published_at: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<BlogRow> for BlogRecord {
    fn from(row: BlogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            content: row.content,
            excerpt: row.excerpt,
            featured_image: row.featured_image,
            author_id: row.author_id,
            category: row.category,
            tags: row.tags.0,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            status: row.status,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Table for BlogRecord {
    const TABLE: &'static str = "blogs";
    const COLUMNS: &'static str = BLOG_COLUMNS;

    type Row = BlogRow;
}

impl KeyedTable for BlogRecord {}

#[async_trait]
impl BlogsWriteRepo for PostgresRepositories {
    async fn create_blog(&self, params: CreateBlogParams) -> Result<BlogRecord, RepoError> {
        let mut qb = QueryBuilder::new(
            "INSERT INTO blogs (title, slug, content, excerpt, featured_image, author_id, \
             category, tags, meta_title, meta_description, status, published_at) ",
        );
        qb.push_values([params], |mut row, params| {
            row.push_bind(params.title)
                .push_bind(params.slug)
                .push_bind(params.content)
                .push_bind(params.excerpt)
                .push_bind(params.featured_image)
                .push_bind(params.author_id)
                .push_bind(params.category)
                .push_bind(Json(params.tags))
                .push_bind(params.meta_title)
                .push_bind(params.meta_description)
                .push_bind(params.status)
                .push_bind(params.published_at);
        });
        qb.push(" RETURNING ");
        qb.push(BLOG_COLUMNS);

        let row = qb
            .build_query_as::<BlogRow>()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_blog(
        &self,
        id: i64,
        params: UpdateBlogParams,
    ) -> Result<Option<BlogRecord>, RepoError> {
        let mut qb = QueryBuilder::new("UPDATE blogs SET ");
        let mut set = qb.separated(", ");
        push_assignment(&mut set, "title", params.title);
        push_assignment(&mut set, "slug", params.slug);
        push_assignment(&mut set, "content", params.content);
        push_assignment(&mut set, "excerpt", params.excerpt);
        push_assignment(&mut set, "featured_image", params.featured_image);
        push_assignment(&mut set, "category", params.category);
        push_assignment(&mut set, "tags", params.tags.map(Json));
        push_assignment(&mut set, "meta_title", params.meta_title);
        push_assignment(&mut set, "meta_description", params.meta_description);
        push_assignment(&mut set, "status", params.status);
        push_assignment(&mut set, "published_at", params.published_at);
        set.push("updated_at = NOW()");

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING ");
        qb.push(BLOG_COLUMNS);

        let row = qb
            .build_query_as::<BlogRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(BlogRecord::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogRecord>, RepoError> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE slug = $1");
        let row = sqlx::query_as::<_, BlogRow>(&sql)
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(BlogRecord::from))
    }

    async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool, RepoError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM blogs WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }
}
