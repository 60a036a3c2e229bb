//! Document shell wrapping every server-rendered page

use crate::config::GeneralConfig;
use crate::html::escape::{escape_html, serialize_state};
use crate::html::{Assets, Page};
use serde_json::Value;
use std::fmt::Write;

/// Full HTML document around a pre-rendered page
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    pub title: String,
    pub description: String,
    /// `<html lang>` value
    pub locale: String,
    /// `og:locale` value
    pub og_locale: String,
    pub assets: Assets,
    /// Pre-rendered page markup, inserted as is
    pub content: String,
    /// State handed to the client as `window._flux_store_data`
    pub store_state: Value,
    page_title: Option<String>,
}

impl HtmlDocument {
    pub fn new(general: &GeneralConfig, assets: &Assets) -> Self {
        Self {
            title: general.title.clone(),
            description: general.description.clone(),
            locale: general.locale.clone(),
            og_locale: general.og_locale.clone(),
            assets: assets.clone(),
            content: String::new(),
            store_state: Value::Object(Default::default()),
            page_title: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Embeds `page`; its title replaces the site title in `<title>`
    pub fn with_page(mut self, page: Page) -> Self {
        self.page_title = Some(page.title);
        self.content = page.body;
        self
    }

    pub fn with_store_state(mut self, state: Value) -> Self {
        self.store_state = state;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Text of the `<title>` element
    pub fn document_title(&self) -> &str {
        self.page_title.as_deref().unwrap_or(&self.title)
    }

    /// Renders the document, doctype included
    pub fn render(&self) -> String {
        let title = escape_html(&self.title);
        let description = escape_html(&self.description);

        // Fallback keeps the page usable if the state cannot be serialized
        let state = serialize_state(&self.store_state).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize store state: {}", e);
            "{}".to_string()
        });

        let mut html = String::with_capacity(1024 + self.content.len());
        html.push_str("<!doctype html>\n");
        let _ = write!(html, "<html lang=\"{}\">", escape_html(&self.locale));

        html.push_str("<head>");
        html.push_str("<meta charset=\"utf-8\"/>");
        let _ = write!(html, "<title>{}</title>", escape_html(self.document_title()));
        let _ = write!(html, "<meta property=\"og:site_name\" content=\"{}\"/>", title);
        let _ = write!(
            html,
            "<meta property=\"og:locale\" content=\"{}\"/>",
            escape_html(&self.og_locale)
        );
        let _ = write!(html, "<meta property=\"og:title\" content=\"{}\"/>", title);
        let _ = write!(
            html,
            "<meta property=\"og:description\" content=\"{}\"/>",
            description
        );
        html.push_str("<meta name=\"twitter:card\" content=\"summary\"/>");
        for href in self.assets.styles.values() {
            let _ = write!(
                html,
                "<link href=\"{}\" media=\"screen, projection\" rel=\"stylesheet\" type=\"text/css\"/>",
                escape_html(href)
            );
        }
        html.push_str("</head>");

        html.push_str("<body>");
        let _ = write!(html, "<div id=\"content\">{}</div>", self.content);
        let _ = write!(html, "<script>window._flux_store_data={};</script>", state);
        for src in self.assets.javascript.values() {
            let _ = write!(html, "<script src=\"{}\"></script>", escape_html(src));
        }
        html.push_str("</body>");
        html.push_str("</html>");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn assets() -> Assets {
        let mut assets = Assets::default();
        assets.styles.insert("main".into(), "/assets/main.css".into());
        assets.javascript.insert("main".into(), "/assets/main.js".into());
        assets.javascript.insert("common".into(), "/assets/common.js".into());
        assets
    }

    #[test]
    fn test_render_full_document() {
        let document = HtmlDocument::new(&GeneralConfig::default(), &assets())
            .with_content("<p>Hi</p>")
            .with_store_state(json!({ "user": null }));

        let expected = concat!(
            "<!doctype html>\n",
            "<html lang=\"en-us\">",
            "<head>",
            "<meta charset=\"utf-8\"/>",
            "<title>Cinema</title>",
            "<meta property=\"og:site_name\" content=\"Cinema\"/>",
            "<meta property=\"og:locale\" content=\"en_US\"/>",
            "<meta property=\"og:title\" content=\"Cinema\"/>",
            "<meta property=\"og:description\" content=\"Workflow\"/>",
            "<meta name=\"twitter:card\" content=\"summary\"/>",
            "<link href=\"/assets/main.css\" media=\"screen, projection\" rel=\"stylesheet\" type=\"text/css\"/>",
            "</head>",
            "<body>",
            "<div id=\"content\"><p>Hi</p></div>",
            "<script>window._flux_store_data={\"user\":null};</script>",
            "<script src=\"/assets/common.js\"></script>",
            "<script src=\"/assets/main.js\"></script>",
            "</body>",
            "</html>",
        );
        assert_eq!(document.render(), expected);
    }

    #[test]
    fn test_page_title_overrides_site_title() {
        let page = Page {
            title: "Oops".to_string(),
            body: "<h1>Oops</h1>".to_string(),
        };
        let document = HtmlDocument::new(&GeneralConfig::default(), &Assets::default()).with_page(page);
        let html = document.render();

        assert!(html.contains("<title>Oops</title>"));
        assert!(html.contains("<meta property=\"og:title\" content=\"Cinema\"/>"));
        assert!(html.contains("<div id=\"content\"><h1>Oops</h1></div>"));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let mut general = GeneralConfig::default();
        general.title = "Tom & \"Jerry\"".to_string();
        let document = HtmlDocument::new(&general, &Assets::default()).with_locale("ru\"><x");
        let html = document.render();

        assert!(html.contains("<html lang=\"ru&quot;&gt;&lt;x\">"));
        assert!(html.contains("<title>Tom &amp; &quot;Jerry&quot;</title>"));
    }

    #[test]
    fn test_store_state_cannot_close_script() {
        let document = HtmlDocument::new(&GeneralConfig::default(), &Assets::default())
            .with_store_state(json!({ "x": "</script><script>alert(1)//" }));
        let html = document.render();

        assert_eq!(html.matches("</script>").count(), 1);
    }
}
