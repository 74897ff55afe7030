// src/services/blog_service.rs

use std::collections::{HashMap, HashSet};

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BlogRepository,
    models::{
        blog::{BlogFilter, BlogPost, BlogPostPayload, BlogPostView, LegacyBlogPost, PostTagRow},
        language::Language,
        tag::Tag,
    },
};

/// Junta as tags (vindas de outra consulta) em cada post.
pub fn attach_tags(posts: Vec<BlogPost>, rows: Vec<PostTagRow>) -> Vec<BlogPostView> {
    let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in rows {
        tags_by_post.entry(row.post_id).or_default().push(row.tag);
    }

    posts
        .into_iter()
        .map(|post| {
            let tags = tags_by_post.remove(&post.id).unwrap_or_default();
            BlogPostView::from_current(post, tags)
        })
        .collect()
}

/// Descarta os posts antigos que já têm registro no esquema atual,
/// mesmo que esse registro seja rascunho ou de outro idioma.
pub fn without_migrated(legacy: Vec<LegacyBlogPost>, migrated: &HashSet<Uuid>) -> Vec<LegacyBlogPost> {
    legacy.into_iter().filter(|p| !migrated.contains(&p.id)).collect()
}

/// Une os dois esquemas. Mesmo id nos dois: vale o esquema atual.
/// Resultado do mais recente para o mais antigo.
pub fn merge_posts(current: Vec<BlogPostView>, legacy: Vec<BlogPostView>) -> Vec<BlogPostView> {
    let current_ids: HashSet<Uuid> = current.iter().map(|p| p.id).collect();

    let mut merged = current;
    merged.extend(legacy.into_iter().filter(|p| !current_ids.contains(&p.id)));
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged
}

#[derive(Clone)]
pub struct BlogService {
    repo: BlogRepository,
    pool: PgPool,
}

impl BlogService {
    pub fn new(repo: BlogRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    async fn with_tags(&self, posts: Vec<BlogPost>) -> Result<Vec<BlogPostView>, AppError> {
        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let rows = self.repo.tags_for_posts(&ids).await?;
        Ok(attach_tags(posts, rows))
    }

    async fn view_of(&self, post: BlogPost) -> Result<BlogPostView, AppError> {
        self.with_tags(vec![post])
            .await?
            .pop()
            .ok_or(AppError::PostNotFound)
    }

    // =========================================================================
    //  PÚBLICO
    // =========================================================================

    pub async fn list_public(&self, lang: Language, filter: &BlogFilter) -> Result<Vec<BlogPostView>, AppError> {
        let tag = filter.tag.as_deref().filter(|t| !t.is_empty());
        let search = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

        let current = self.repo.list_current(Some(lang), true, tag, search).await?;
        let current = self.with_tags(current).await?;

        // O esquema antigo não tem tags: com filtro de tag ele não entra
        let legacy = if tag.is_some() {
            Vec::new()
        } else {
            self.visible_legacy(self.repo.list_legacy(true, search).await?)
                .await?
                .into_iter()
                .map(|post| post.project(lang))
                .collect()
        };

        Ok(merge_posts(current, legacy))
    }

    pub async fn get_public(&self, lang: Language, slug: &str) -> Result<BlogPostView, AppError> {
        if let Some(post) = self.repo.find_current_by_slug(lang, slug).await? {
            return self.view_of(post).await;
        }

        let legacy = self.repo.find_legacy_by_slug(slug).await?.into_iter().collect();
        let legacy = self.visible_legacy(legacy)
            .await?
            .pop()
            .ok_or(AppError::PostNotFound)?;
        Ok(legacy.project(lang))
    }

    async fn visible_legacy(&self, legacy: Vec<LegacyBlogPost>) -> Result<Vec<LegacyBlogPost>, AppError> {
        let ids: Vec<Uuid> = legacy.iter().map(|p| p.id).collect();
        let migrated = self.repo.existing_current_ids(&ids).await?;
        Ok(without_migrated(legacy, &migrated))
    }

    // =========================================================================
    //  ADMIN
    // =========================================================================

    pub async fn list_all(&self) -> Result<Vec<BlogPostView>, AppError> {
        let posts = self.repo.list_current(None, false, None, None).await?;
        self.with_tags(posts).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<BlogPostView, AppError> {
        let post = self.repo.find_current_by_id(id).await?.ok_or(AppError::PostNotFound)?;
        self.view_of(post).await
    }

    pub async fn create(&self, input: &BlogPostPayload) -> Result<BlogPostView, AppError> {
        let mut tx = self.pool.begin().await?;

        let post = self.repo.insert_post(&mut *tx, input).await?;
        self.repo.set_post_tags(&mut tx, post.id, &input.tag_ids).await?;

        tx.commit().await?;

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post criado");
        self.view_of(post).await
    }

    pub async fn update(&self, id: Uuid, input: &BlogPostPayload) -> Result<BlogPostView, AppError> {
        let mut tx = self.pool.begin().await?;

        let post = self.repo
            .update_post(&mut *tx, id, input)
            .await?
            .ok_or(AppError::PostNotFound)?;
        self.repo.set_post_tags(&mut tx, post.id, &input.tag_ids).await?;

        tx.commit().await?;

        tracing::info!(post_id = %post.id, "Post atualizado");
        self.view_of(post).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_post(id).await? {
            return Err(AppError::PostNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::blog::PostSource;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, day, 10, 0, 0).unwrap()
    }

    fn current(n: u128, day: u32) -> BlogPost {
        BlogPost {
            id: Uuid::from_u128(n),
            slug: format!("post-{}", n),
            language: Language::Es,
            title: format!("Actual {}", n),
            excerpt: None,
            content: "<p>contenido</p>".to_string(),
            cover_image_url: None,
            author_name: Some("Equipo".to_string()),
            is_published: true,
            published_at: Some(at(day)),
            created_at: at(1),
            updated_at: at(1),
        }
    }

    fn legacy(n: u128, day: u32) -> LegacyBlogPost {
        LegacyBlogPost {
            id: Uuid::from_u128(n),
            slug: format!("legacy-{}", n),
            title_es: format!("Antiguo {}", n),
            title_en: Some(format!("Old {}", n)),
            excerpt_es: Some("resumen".to_string()),
            excerpt_en: Some("  ".to_string()),
            content_es: "contenido".to_string(),
            content_en: None,
            image_url: None,
            is_published: true,
            created_at: at(day),
        }
    }

    fn tag(n: u128) -> Tag {
        Tag {
            id: Uuid::from_u128(100 + n),
            name: format!("Tag {}", n),
            slug: format!("tag-{}", n),
            color: None,
            category_id: None,
            created_at: at(1),
        }
    }

    #[test]
    fn current_schema_wins_on_same_id() {
        let current_posts = attach_tags(vec![current(1, 10)], vec![]);
        let legacy_posts = vec![legacy(1, 20).project(Language::Es), legacy(2, 5).project(Language::Es)];

        let merged = merge_posts(current_posts, legacy_posts);

        assert_eq!(merged.len(), 2);
        let first = merged.iter().find(|p| p.id == Uuid::from_u128(1)).unwrap();
        assert_eq!(first.source, PostSource::Current);
        assert_eq!(first.title, "Actual 1");
    }

    #[test]
    fn legacy_row_stays_hidden_when_its_current_twin_is_a_draft() {
        // Rascunho (ou post em inglês) com o mesmo id: não aparece em `current`
        let migrated: HashSet<Uuid> = [Uuid::from_u128(1)].into_iter().collect();

        let legacy = without_migrated(vec![legacy(1, 20), legacy(2, 5)], &migrated);
        let merged = merge_posts(
            Vec::new(),
            legacy.into_iter().map(|p| p.project(Language::Es)).collect(),
        );

        let ids: Vec<Uuid> = merged.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Uuid::from_u128(2)]);
    }

    #[test]
    fn legacy_lookup_by_slug_misses_once_migrated() {
        let migrated: HashSet<Uuid> = [Uuid::from_u128(7)].into_iter().collect();
        assert!(without_migrated(vec![legacy(7, 1)], &migrated).pop().is_none());
        assert_eq!(without_migrated(vec![legacy(8, 1)], &migrated).len(), 1);
    }

    #[test]
    fn merged_list_is_newest_first() {
        let merged = merge_posts(
            attach_tags(vec![current(1, 3), current(2, 15)], vec![]),
            vec![legacy(3, 9).project(Language::Es)],
        );
        let order: Vec<Uuid> = merged.iter().map(|p| p.id).collect();
        assert_eq!(order, vec![Uuid::from_u128(2), Uuid::from_u128(3), Uuid::from_u128(1)]);
    }

    #[test]
    fn attach_tags_groups_by_post() {
        let rows = vec![
            PostTagRow { post_id: Uuid::from_u128(1), tag: tag(1) },
            PostTagRow { post_id: Uuid::from_u128(1), tag: tag(2) },
            PostTagRow { post_id: Uuid::from_u128(2), tag: tag(3) },
        ];
        let views = attach_tags(vec![current(1, 1), current(2, 2), current(3, 3)], rows);

        assert_eq!(views[0].tags.len(), 2);
        assert_eq!(views[1].tags[0].slug, "tag-3");
        assert!(views[2].tags.is_empty());
    }

    #[test]
    fn unpublished_date_falls_back_to_creation() {
        let mut post = current(1, 10);
        post.published_at = None;
        let view = BlogPostView::from_current(post, vec![]);
        assert_eq!(view.published_at, at(1));
    }

    #[test]
    fn legacy_projection_falls_back_to_spanish() {
        let en = legacy(1, 4).project(Language::En);
        assert_eq!(en.title, "Old 1");
        // Inglês em branco ou ausente cai no espanhol
        assert_eq!(en.excerpt.as_deref(), Some("resumen"));
        assert_eq!(en.content, "contenido");
        assert_eq!(en.language, Language::En);
        assert_eq!(en.source, PostSource::Legacy);

        let es = legacy(1, 4).project(Language::Es);
        assert_eq!(es.title, "Antiguo 1");
        assert!(es.tags.is_empty());
    }
}
