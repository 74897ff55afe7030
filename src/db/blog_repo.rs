// src/db/blog_repo.rs

use std::collections::HashSet;

use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        blog::{BlogPost, BlogPostPayload, LegacyBlogPost, PostSlug, PostTagRow},
        language::Language,
    },
};

#[derive(Clone)]
pub struct BlogRepository {
    pool: PgPool,
}

fn map_post_write_error(e: sqlx::Error, input: &BlogPostPayload) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(format!(
                "O slug '{}' já existe em '{}'.",
                input.slug,
                input.language.code()
            ));
        }
    }
    e.into()
}

impl BlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ESQUEMA ATUAL
    // =========================================================================

    pub async fn list_current(
        &self,
        language: Option<Language>,
        published_only: bool,
        tag_slug: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<BlogPost>, AppError> {
        let posts = sqlx::query_as::<_, BlogPost>(
            r#"
            SELECT p.* FROM blog_posts p
            WHERE ($1::content_language IS NULL OR p.language = $1)
              AND ($2 = FALSE OR p.is_published)
              AND ($3::TEXT IS NULL OR EXISTS (
                    SELECT 1 FROM blog_post_tags bpt
                    JOIN tags t ON t.id = bpt.tag_id
                    WHERE bpt.post_id = p.id AND t.slug = $3
              ))
              AND ($4::TEXT IS NULL OR p.title ILIKE '%' || $4 || '%')
            ORDER BY COALESCE(p.published_at, p.created_at) DESC
            "#,
        )
        .bind(language)
        .bind(published_only)
        .bind(tag_slug)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn find_current_by_slug(
        &self,
        language: Language,
        slug: &str,
    ) -> Result<Option<BlogPost>, AppError> {
        let post = sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts WHERE language = $1 AND slug = $2 AND is_published",
        )
        .bind(language)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    pub async fn find_current_by_id(&self, id: Uuid) -> Result<Option<BlogPost>, AppError> {
        let post = sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    pub async fn tags_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostTagRow>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT bpt.post_id, t.id, t.name, t.slug, t.color, t.category_id, t.created_at
            FROM blog_post_tags bpt
            JOIN tags t ON t.id = bpt.tag_id
            WHERE bpt.post_id = ANY($1)
            ORDER BY t.name
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Ids que já existem no esquema atual, em qualquer idioma ou status.
    pub async fn existing_current_ids(&self, ids: &[Uuid]) -> Result<HashSet<Uuid>, AppError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let found: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM blog_posts WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(found.into_iter().collect())
    }

    pub async fn list_published_slugs(&self) -> Result<Vec<PostSlug>, AppError> {
        let slugs = sqlx::query_as::<_, PostSlug>(
            "SELECT slug, language, updated_at FROM blog_posts WHERE is_published ORDER BY slug",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(slugs)
    }

    pub async fn insert_post<'e, E>(&self, executor: E, input: &BlogPostPayload) -> Result<BlogPost, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BlogPost>(
            r#"
            INSERT INTO blog_posts (
                slug, language, title, excerpt, content, cover_image_url,
                author_name, is_published, published_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                    CASE WHEN $8 THEN COALESCE($9, now()) ELSE $9 END)
            RETURNING *
            "#,
        )
        .bind(&input.slug)
        .bind(input.language)
        .bind(input.title.trim())
        .bind(input.excerpt.as_deref())
        .bind(&input.content)
        .bind(input.cover_image_url.as_deref())
        .bind(input.author_name.as_deref())
        .bind(input.is_published)
        .bind(input.published_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_post_write_error(e, input))
    }

    pub async fn update_post<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &BlogPostPayload,
    ) -> Result<Option<BlogPost>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BlogPost>(
            r#"
            UPDATE blog_posts SET
                slug = $2, language = $3, title = $4, excerpt = $5, content = $6,
                cover_image_url = $7, author_name = $8, is_published = $9,
                published_at = CASE WHEN $9 THEN COALESCE($10, published_at, now()) ELSE $10 END,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.slug)
        .bind(input.language)
        .bind(input.title.trim())
        .bind(input.excerpt.as_deref())
        .bind(&input.content)
        .bind(input.cover_image_url.as_deref())
        .bind(input.author_name.as_deref())
        .bind(input.is_published)
        .bind(input.published_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_post_write_error(e, input))
    }

    pub async fn set_post_tags(&self, conn: &mut PgConnection, post_id: Uuid, tag_ids: &[Uuid]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM blog_post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO blog_post_tags (post_id, tag_id)
            SELECT $1, UNNEST($2::UUID[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return AppError::TagNotFound;
                }
            }
            AppError::from(e)
        })?;

        Ok(())
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  ESQUEMA ANTIGO (somente leitura)
    // =========================================================================

    pub async fn list_legacy(&self, published_only: bool, search: Option<&str>) -> Result<Vec<LegacyBlogPost>, AppError> {
        let posts = sqlx::query_as::<_, LegacyBlogPost>(
            r#"
            SELECT * FROM legacy_blog_posts
            WHERE ($1 = FALSE OR is_published)
              AND ($2::TEXT IS NULL
                   OR title_es ILIKE '%' || $2 || '%'
                   OR title_en ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            "#,
        )
        .bind(published_only)
        .bind(search)
        .fetch_all(&self.pool)
        .await?;
        Ok(posts)
    }

    pub async fn find_legacy_by_slug(&self, slug: &str) -> Result<Option<LegacyBlogPost>, AppError> {
        let post = sqlx::query_as::<_, LegacyBlogPost>(
            "SELECT * FROM legacy_blog_posts WHERE slug = $1 AND is_published",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }
}
