// src/services/seo_service.rs

use std::fmt::Write;

use crate::{
    common::error::AppError,
    db::{BlogRepository, TourRepository},
    models::{
        blog::PostSlug,
        language::Language,
        tour::TourSlug,
    },
};

struct StaticPage {
    es: &'static str,
    en: &'static str,
    priority: f32,
    changefreq: &'static str,
}

// Páginas fixas do site, por idioma
const STATIC_PAGES: &[StaticPage] = &[
    StaticPage { es: "/es", en: "/en", priority: 1.0, changefreq: "daily" },
    StaticPage { es: "/es/tours", en: "/en/tours", priority: 0.9, changefreq: "daily" },
    StaticPage { es: "/es/destinos", en: "/en/destinations", priority: 0.8, changefreq: "weekly" },
    StaticPage { es: "/es/galapagos", en: "/en/galapagos", priority: 0.8, changefreq: "weekly" },
    StaticPage { es: "/es/servicios/vuelos", en: "/en/services/flights", priority: 0.8, changefreq: "monthly" },
    StaticPage { es: "/es/servicios/visas", en: "/en/services/visas", priority: 0.8, changefreq: "monthly" },
    StaticPage { es: "/es/blog", en: "/en/blog", priority: 0.7, changefreq: "weekly" },
    StaticPage { es: "/es/contacto", en: "/en/contact", priority: 0.6, changefreq: "yearly" },
];

const TOUR_PRIORITY: f32 = 0.7;
const POST_PRIORITY: f32 = 0.6;

/// Junta base e caminho com exatamente uma barra entre eles.
pub fn canonical_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

pub fn tour_path(lang: Language, slug: &str) -> String {
    format!("/{}/tours/{}", lang.code(), slug)
}

pub fn post_path(lang: Language, slug: &str) -> String {
    format!("/{}/blog/{}", lang.code(), slug)
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>, changefreq: &str, priority: f32) {
    xml.push_str("  <url>\n");
    let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(loc));
    if let Some(lastmod) = lastmod {
        let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod);
    }
    let _ = writeln!(xml, "    <changefreq>{}</changefreq>", changefreq);
    let _ = writeln!(xml, "    <priority>{:.1}</priority>", priority);
    xml.push_str("  </url>\n");
}

pub fn build_sitemap(base_url: &str, tours: &[TourSlug], posts: &[PostSlug]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );

    for page in STATIC_PAGES {
        for path in [page.es, page.en] {
            push_url(&mut xml, &canonical_url(base_url, path), None, page.changefreq, page.priority);
        }
    }

    for tour in tours {
        let lastmod = tour.updated_at.format("%Y-%m-%d").to_string();
        for lang in Language::ALL {
            let loc = canonical_url(base_url, &tour_path(lang, &tour.slug));
            push_url(&mut xml, &loc, Some(&lastmod), "weekly", TOUR_PRIORITY);
        }
    }

    for post in posts {
        let lastmod = post.updated_at.format("%Y-%m-%d").to_string();
        let loc = canonical_url(base_url, &post_path(post.language, &post.slug));
        push_url(&mut xml, &loc, Some(&lastmod), "monthly", POST_PRIORITY);
    }

    xml.push_str("</urlset>\n");
    xml
}

pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/admin\n\nSitemap: {}\n",
        canonical_url(base_url, "/sitemap.xml")
    )
}

#[derive(Clone)]
pub struct SeoService {
    tour_repo: TourRepository,
    blog_repo: BlogRepository,
    base_url: String,
}

impl SeoService {
    pub fn new(tour_repo: TourRepository, blog_repo: BlogRepository, base_url: String) -> Self {
        Self { tour_repo, blog_repo, base_url }
    }

    pub async fn sitemap(&self) -> Result<String, AppError> {
        let tours = self.tour_repo.list_published_slugs().await?;
        let posts = self.blog_repo.list_published_slugs().await?;
        tracing::debug!(tours = tours.len(), posts = posts.len(), "Gerando sitemap");
        Ok(build_sitemap(&self.base_url, &tours, &posts))
    }

    pub fn robots(&self) -> String {
        robots_txt(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const BASE: &str = "https://viajes.example.com";

    #[test]
    fn canonical_url_normalizes_slashes() {
        assert_eq!(canonical_url("https://a.com/", "/es/tours"), "https://a.com/es/tours");
        assert_eq!(canonical_url("https://a.com", "es/tours"), "https://a.com/es/tours");
        assert_eq!(canonical_url("https://a.com//", ""), "https://a.com/");
    }

    #[test]
    fn sitemap_lists_static_pages_and_tours_in_both_languages() {
        let tours = vec![TourSlug {
            slug: "galapagos-5-dias".to_string(),
            updated_at: Utc.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap(),
        }];
        let xml = build_sitemap(BASE, &tours, &[]);

        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://viajes.example.com/es/servicios/vuelos</loc>"));
        assert!(xml.contains("<loc>https://viajes.example.com/en/destinations</loc>"));
        assert!(xml.contains("<loc>https://viajes.example.com/es/tours/galapagos-5-dias</loc>"));
        assert!(xml.contains("<loc>https://viajes.example.com/en/tours/galapagos-5-dias</loc>"));
        assert!(xml.contains("<lastmod>2025-03-09</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert_eq!(xml.matches("<url>").count(), STATIC_PAGES.len() * 2 + 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn sitemap_includes_posts_in_their_language() {
        let posts = vec![PostSlug {
            slug: "que-llevar".to_string(),
            language: Language::Es,
            updated_at: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
        }];
        let xml = build_sitemap(BASE, &[], &posts);
        assert!(xml.contains("/es/blog/que-llevar</loc>"));
        assert!(!xml.contains("/en/blog/que-llevar"));
    }

    #[test]
    fn sitemap_escapes_xml() {
        let xml = build_sitemap("https://a.com/?x=1&y=<2>", &[], &[]);
        assert!(xml.contains("&amp;y=&lt;2&gt;"));
        assert!(!xml.contains("&y=<2>"));
    }

    #[test]
    fn robots_points_to_sitemap() {
        let robots = robots_txt("https://viajes.example.com/");
        assert!(robots.contains("Disallow: /admin\n"));
        assert!(robots.ends_with("Sitemap: https://viajes.example.com/sitemap.xml\n"));
    }
}
