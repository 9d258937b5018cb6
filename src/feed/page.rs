//! Static page, sitemap, and robots.txt rendering
//!
//! The landing page only has to host the `#dynamic-banners` container; it is
//! pre-filled with the first slots of the pool so the page is not empty
//! before the first rotation.

use chrono::NaiveDate;
use handlebars::Handlebars;
use serde::Serialize;

use crate::models::Ad;

/// Id of the element the rotation loop renders into
pub const BANNER_CONTAINER_ID: &str = "dynamic-banners";

const INDEX_TEMPLATE_NAME: &str = "index";

const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="ja">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{site_name}}</title>
    <style>
        .footer-banners { display: flex; gap: 16px; transition: opacity 0.3s ease-in-out; }
        .banner-ad { flex: 1; padding: 16px; border-radius: 8px; color: #fff; animation: slideInUp 0.6s ease-out both; }
        @keyframes slideInUp {
            from { transform: translateY(30px); opacity: 0; }
            to { transform: translateY(0); opacity: 1; }
        }
    </style>
</head>
<body>
    <footer>
        <div id="{{container_id}}" class="footer-banners">
            {{#each banners}}
            <div class="banner-ad" style="background-color: {{bgColor}}; animation-delay: {{animation_delay}};">
                <div class="banner-text">
                    <h3>{{title}}</h3>
                    <p class="banner-subtitle">{{subtitle}}</p>
                    <p class="banner-description">{{description}}</p>
                    {{#if instructor}}<p class="banner-instructor">{{instructor}}</p>{{/if}}
                    {{#if company}}<p class="banner-company">{{company}}</p>{{/if}}
                </div>
                <button class="banner-btn" data-title="{{title}}">{{buttonText}}</button>
            </div>
            {{/each}}
        </div>
    </footer>
</body>
</html>
"#;

#[derive(Serialize)]
struct BannerView<'a> {
    #[serde(flatten)]
    ad: &'a Ad,
    animation_delay: String,
}

#[derive(Serialize)]
struct IndexView<'a> {
    site_name: &'a str,
    container_id: &'a str,
    banners: Vec<BannerView<'a>>,
}

/// Compiled page templates
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    /// Compile the built-in templates
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_template_string(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// Render the landing page with an initial set of banners
    pub fn render_index(&self, banners: &[Ad]) -> Result<String, handlebars::RenderError> {
        let view = IndexView {
            site_name: "bannerwheel",
            container_id: BANNER_CONTAINER_ID,
            banners: banners
                .iter()
                .enumerate()
                .map(|(index, ad)| BannerView {
                    ad,
                    animation_delay: format!("{:.1}s", index as f64 * 0.2),
                })
                .collect(),
        };

        self.registry.render(INDEX_TEMPLATE_NAME, &view)
    }
}

/// Sitemap listing the landing page and the banner feed
pub fn sitemap_xml(base_url: &str, lastmod: NaiveDate) -> String {
    let lastmod = lastmod.format("%Y-%m-%d");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
    <url>
        <loc>{base_url}/</loc>
        <lastmod>{lastmod}</lastmod>
        <changefreq>daily</changefreq>
        <priority>1.0</priority>
    </url>
    <url>
        <loc>{base_url}/api/banner-ads</loc>
        <lastmod>{lastmod}</lastmod>
        <changefreq>hourly</changefreq>
        <priority>0.8</priority>
    </url>
</urlset>"#
    )
}

/// robots.txt allowing all crawlers and pointing at the sitemap
pub fn robots_txt(base_url: &str) -> String {
    format!("User-agent: *\nAllow: /\n\nSitemap: {base_url}/sitemap.xml\n")
}
