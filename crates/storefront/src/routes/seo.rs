//! SEO route handlers: sitemap, robots, and per-route metadata.

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::db::{CatalogRepository, SeoRepository};
use crate::db::seo::SeoRecord;
use crate::error::{AppError, Result};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Query parameters for `GET /api/seo`.
#[derive(Debug, Deserialize)]
pub struct SeoQuery {
    pub path: String,
}

/// `GET /api/seo?path=/...` - metadata for a route path.
pub async fn metadata(
    State(state): State<AppState>,
    Query(query): Query<SeoQuery>,
) -> Result<Json<ApiResponse<SeoRecord>>> {
    if !query.path.starts_with('/') {
        return Err(AppError::Validation("path must start with /".to_owned()));
    }

    let record = SeoRepository::new(state.pool())
        .get_by_path(&query.path)
        .await?
        .ok_or_else(|| AppError::NotFound("No metadata for this path".to_owned()))?;

    Ok(Json(ApiResponse::ok(record)))
}

/// `GET /sitemap.xml` - sitemap generated from the visible catalog.
pub async fn sitemap(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let repo = CatalogRepository::new(state.pool());
    let products = repo.product_sitemap_entries().await?;
    let categories = repo.category_sitemap_entries().await?;

    let base = state.config().base_url.trim_end_matches('/');
    let mut xml = String::with_capacity(1024);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    push_url(&mut xml, &format!("{base}/"), None);
    for entry in &categories {
        push_url(
            &mut xml,
            &format!("{base}/categories/{}", entry.slug),
            Some(&entry.updated_at.format("%Y-%m-%d").to_string()),
        );
    }
    for entry in &products {
        push_url(
            &mut xml,
            &format!("{base}/products/{}", entry.slug),
            Some(&entry.updated_at.format("%Y-%m-%d").to_string()),
        );
    }

    xml.push_str("</urlset>\n");

    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

/// `GET /robots.txt` - allow crawling of public pages, keep bots out of
/// the API and account areas.
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    let base = state.config().base_url.trim_end_matches('/');
    let body = format!(
        "User-agent: *\nAllow: /\nDisallow: /api/\nDisallow: /account\n\nSitemap: {base}/sitemap.xml\n"
    );
    ([(header::CONTENT_TYPE, "text/plain")], body)
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<&str>) {
    xml.push_str("  <url><loc>");
    xml.push_str(loc);
    xml.push_str("</loc>");
    if let Some(lastmod) = lastmod {
        xml.push_str("<lastmod>");
        xml.push_str(lastmod);
        xml.push_str("</lastmod>");
    }
    xml.push_str("</url>\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_url_with_lastmod() {
        let mut xml = String::new();
        push_url(&mut xml, "https://shop.example/products/dates", Some("2026-08-01"));
        assert!(xml.contains("<loc>https://shop.example/products/dates</loc>"));
        assert!(xml.contains("<lastmod>2026-08-01</lastmod>"));
    }

    #[test]
    fn test_push_url_without_lastmod() {
        let mut xml = String::new();
        push_url(&mut xml, "https://shop.example/", None);
        assert!(!xml.contains("lastmod"));
    }
}
