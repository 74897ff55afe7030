// src/models/blog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::validation::{validate_not_blank, validate_slug},
    models::{language::Language, tag::Tag},
};

// --- ESQUEMA ATUAL (canônico) ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub slug: String,
    pub language: Language,
    pub title: String,
    pub excerpt: Option<String>,
    // Rich text do editor, guardado como veio
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author_name: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- ESQUEMA ANTIGO (bilíngue, só leitura) ---

#[derive(Debug, Clone, FromRow)]
pub struct LegacyBlogPost {
    pub id: Uuid,
    pub slug: String,
    pub title_es: String,
    pub title_en: Option<String>,
    pub excerpt_es: Option<String>,
    pub excerpt_en: Option<String>,
    pub content_es: String,
    pub content_en: Option<String>,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

// Linha de blog_post_tags + tags
#[derive(Debug, Clone, FromRow)]
pub struct PostTagRow {
    pub post_id: Uuid,
    #[sqlx(flatten)]
    pub tag: Tag,
}

#[derive(Debug, Clone, FromRow)]
pub struct PostSlug {
    pub slug: String,
    pub language: Language,
    pub updated_at: DateTime<Utc>,
}

// --- VIEW MODEL ---

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostSource {
    Current,
    Legacy,
}

/// Post no formato que o site consome, venha de qual esquema vier.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostView {
    pub id: Uuid,
    pub slug: String,
    pub language: Language,
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub author_name: Option<String>,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub tags: Vec<Tag>,
    pub source: PostSource,
}

impl BlogPostView {
    pub fn from_current(post: BlogPost, tags: Vec<Tag>) -> Self {
        Self {
            id: post.id,
            published_at: post.published_at.unwrap_or(post.created_at),
            slug: post.slug,
            language: post.language,
            title: post.title,
            excerpt: post.excerpt,
            content: post.content,
            cover_image_url: post.cover_image_url,
            author_name: post.author_name,
            is_published: post.is_published,
            tags,
            source: PostSource::Current,
        }
    }
}

impl LegacyBlogPost {
    /// Projeta o registro bilíngue no idioma pedido. Campo em inglês vazio cai no espanhol.
    pub fn project(self, lang: Language) -> BlogPostView {
        fn pick(preferred: Option<String>, fallback: String) -> String {
            preferred.filter(|s| !s.trim().is_empty()).unwrap_or(fallback)
        }

        let (title, excerpt, content) = match lang {
            Language::Es => (self.title_es, self.excerpt_es, self.content_es),
            Language::En => (
                pick(self.title_en, self.title_es),
                self.excerpt_en.filter(|s| !s.trim().is_empty()).or(self.excerpt_es),
                pick(self.content_en, self.content_es),
            ),
        };

        BlogPostView {
            id: self.id,
            slug: self.slug,
            language: lang,
            title,
            excerpt,
            content,
            cover_image_url: self.image_url,
            author_name: None,
            is_published: self.is_published,
            published_at: self.created_at,
            tags: Vec::new(),
            source: PostSource::Legacy,
        }
    }
}

// --- FILTROS ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogFilter {
    /// Slug da tag
    pub tag: Option<String>,
    pub search: Option<String>,
}

// --- PAYLOADS DO ADMIN ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Qué llevar a Galápagos")]
    pub title: String,

    #[validate(custom(function = "validate_slug"))]
    #[schema(example = "que-llevar-a-galapagos")]
    pub slug: String,

    pub language: Language,

    #[validate(length(max = 500, message = "too_long"))]
    pub excerpt: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,

    pub cover_image_url: Option<String>,
    pub author_name: Option<String>,

    #[serde(default)]
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}
