//! Generic error page

use crate::html::escape::escape_html;
use crate::html::url::{is_safe_redirect, query_param, to_relative_url};
use crate::html::Page;
use crate::i18n::Message;

pub mod messages {
    use crate::i18n::Message;

    pub const HEADER: Message = Message {
        id: "error_page.header",
        description: "Generic error page header",
        default_message: "An error occured",
    };
}

/// Query parameter carrying the URL the failed request was for
const REDIRECT_PARAM: &str = "request";

/// Error page for a request location
///
/// Strings come from the injected `translate` function, usually
/// [`International::translate`](crate::i18n::International::translate) or a
/// closure over it.
pub struct ErrorPage<'a, F>
where
    F: Fn(&Message) -> String,
{
    translate: F,
    location: &'a str,
}

impl<'a, F> ErrorPage<'a, F>
where
    F: Fn(&Message) -> String,
{
    /// `location` is the path and query string of the error page request
    pub fn new(translate: F, location: &'a str) -> Self {
        Self {
            translate,
            location,
        }
    }

    /// Where the "go back" link points: the `request` query parameter when
    /// it is a same-site path or an http(s) URL, `/` otherwise
    pub fn redirect_url(&self) -> String {
        query_param(self.location, REDIRECT_PARAM)
            .filter(|url| is_safe_redirect(url))
            .unwrap_or_else(|| "/".to_string())
    }

    pub fn render(&self) -> Page {
        let header = (self.translate)(&messages::HEADER);
        let redirect = self.redirect_url();

        let body = format!(
            "<section class=\"content error-page\">\
             <h1>{header}</h1>\
             <a href=\"{href}\" class=\"error-page__page-link\">{text}</a>\
             </section>",
            header = escape_html(&header),
            href = escape_html(&redirect),
            text = escape_html(&to_relative_url(&redirect)),
        );

        Page {
            title: header,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::MessageCatalog;
    use pretty_assertions::assert_eq;

    fn default_text(message: &Message) -> String {
        message.default_message.to_string()
    }

    #[test]
    fn test_render_with_default_message() {
        let page = ErrorPage::new(default_text, "/error").render();

        assert_eq!(page.title, "An error occured");
        assert_eq!(
            page.body,
            "<section class=\"content error-page\">\
             <h1>An error occured</h1>\
             <a href=\"/\" class=\"error-page__page-link\">/</a>\
             </section>"
        );
    }

    #[test]
    fn test_redirect_from_request_param() {
        let page = ErrorPage::new(
            default_text,
            "/error?request=https%3A%2F%2Fcinema.example%2Fmovies%3Fpage%3D2",
        );
        assert_eq!(page.redirect_url(), "https://cinema.example/movies?page=2");

        let body = page.render().body;
        assert!(body.contains("href=\"https://cinema.example/movies?page=2\""));
        assert!(body.contains(">/movies?page=2</a>"));
    }

    #[test]
    fn test_empty_request_param_falls_back_to_root() {
        let page = ErrorPage::new(default_text, "/error?request=");
        assert_eq!(page.redirect_url(), "/");
    }

    #[test]
    fn test_script_urls_are_not_linked() {
        for location in [
            "/error?request=javascript%3Aalert(document.cookie)",
            "/error?request=%20javascript%3Aalert(1)",
            "/error?request=data%3Atext%2Fhtml%2C%3Cscript%3Ealert(1)%3C%2Fscript%3E",
            "/error?request=%2F%2Fevil.example",
        ] {
            let page = ErrorPage::new(default_text, location);
            assert_eq!(page.redirect_url(), "/", "{location}");

            let body = page.render().body;
            assert!(body.contains("<a href=\"/\" class=\"error-page__page-link\">/</a>"));
            assert!(!body.contains("javascript"));
        }
    }

    #[test]
    fn test_uses_injected_translation() {
        let mut catalog = MessageCatalog::new("ru");
        catalog.insert("error_page.header", "Произошла ошибка");

        let page = ErrorPage::new(|message: &Message| catalog.translate(message), "/error").render();
        assert_eq!(page.title, "Произошла ошибка");
        assert!(page.body.contains("<h1>Произошла ошибка</h1>"));
    }

    #[test]
    fn test_redirect_is_escaped() {
        let page = ErrorPage::new(default_text, "/error?request=%2Fsearch%3Fq%3D%22%3E%3Cscript%3E").render();
        assert!(!page.body.contains("<script>"));
        assert!(page.body.contains("href=\"/search?q=&quot;&gt;&lt;script&gt;\""));
    }
}
