//! Line-delimited JSON request server
//!
//! Reads one request per stdin line and writes one response per stdout line.
//!
//! ```text
//! > {"method":"POST","path":"/example/user","body":{"name":"Alice"}}
//! < {"status":200,"body":"1"}
//! > {"method":"GET","path":"/error?request=%2Fmovies","lang":"ru"}
//! < {"status":200,"html":"<!doctype html>\n<html lang=\"ru\">..."}
//! ```
//!
//! Paths under `/example/` go to the [`Router`]; `GET /` and `GET /error`
//! are rendered pages. Logs go to stderr, so stdout carries responses only.

use crate::api::{Method, Request, Response, Router};
use crate::config::AppConfig;
use crate::error::{ApiError, LocaleResult};
use crate::html::{ErrorPage, HtmlDocument};
use crate::i18n::{International, Message};
use serde::Serialize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// One response line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Api(Response),
    Page { status: u16, html: String },
}

impl Reply {
    pub fn status(&self) -> u16 {
        match self {
            Reply::Api(response) => response.status,
            Reply::Page { status, .. } => *status,
        }
    }

    fn error(error: ApiError) -> Self {
        Reply::Api(Response::from_error(&error))
    }
}

pub struct Server {
    config: AppConfig,
    router: Router,
    international: International,
    reload_tx: Option<mpsc::UnboundedSender<()>>,
}

impl Server {
    pub fn new(config: AppConfig, international: International) -> Self {
        Self {
            config,
            router: Router::new(),
            international,
            reload_tx: None,
        }
    }

    /// Loads the startup language: `override_tag`, else the configured page
    /// locale, else the default language
    pub async fn bootstrap(&mut self, override_tag: Option<&str>) -> LocaleResult<String> {
        let language = self
            .international
            .resolve_language(override_tag, Some(self.config.general.locale.as_str()));
        self.load_language(&language).await?;
        Ok(language)
    }

    pub fn international(&self) -> &International {
        &self.international
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Parses and handles one request line
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => self.handle(request).await,
            Err(e) => Reply::error(ApiError::BadRequest(format!("Parse error: {}", e))),
        }
    }

    pub async fn handle(&mut self, request: Request) -> Reply {
        if Router::matches(request.route_path()) {
            return Reply::Api(self.router.handle(&request));
        }

        let path = request.route_path();
        if path != "/" && path != "/error" {
            return Reply::error(ApiError::RouteNotFound {
                method: request.method.to_string(),
                path: path.to_string(),
            });
        }
        if request.method != Method::Get {
            return Reply::error(ApiError::MethodNotAllowed {
                method: request.method.to_string(),
                path: path.to_string(),
            });
        }

        if let Some(lang) = request.lang.as_deref().filter(|lang| !lang.trim().is_empty()) {
            self.switch_language(lang.trim()).await;
        }

        let html = self.render_page(&request);
        Reply::Page { status: 200, html }
    }

    fn render_page(&self, request: &Request) -> String {
        let language = self.international.active_language();
        let mut document = HtmlDocument::new(&self.config.general, &self.config.assets)
            .with_store_state(json!({ "locale": language }));
        if let Some(lang) = &request.lang {
            document = document.with_locale(lang.trim());
        }

        if request.route_path() == "/error" {
            let translate = |message: &Message| self.international.translate(message);
            let page = ErrorPage::new(translate, &request.path).render();
            document = document.with_page(page);
        }

        document.render()
    }

    async fn load_language(&mut self, tag: &str) -> LocaleResult<()> {
        self.international.load(tag).await?;
        self.international.load_translation(tag).await?;
        Ok(())
    }

    /// Loads `tag` for page rendering; on failure pages keep rendering with
    /// whatever catalog is active
    async fn switch_language(&mut self, tag: &str) {
        if let Err(e) = self.load_language(tag).await {
            tracing::warn!(tag, "Failed to load language: {}", e);
            return;
        }
        if self.international.watch_is_stale() {
            self.watch_catalog();
        }
    }

    fn watch_catalog(&mut self) {
        if let Some(tx) = &self.reload_tx {
            let tx = tx.clone();
            self.international.hot_reload(move || {
                let _ = tx.send(());
            });
        }
    }

    async fn reload_catalog(&mut self) {
        match self.international.reload_translation().await {
            Ok(catalog) => tracing::info!(
                language = %catalog.language,
                messages = catalog.len(),
                "Translation catalog reloaded"
            ),
            Err(e) => tracing::warn!("Failed to reload translation catalog: {}", e),
        }
    }

    /// Serves stdin until EOF
    pub async fn run(&mut self) -> std::io::Result<()> {
        let (reload_tx, mut reload_rx) = mpsc::unbounded_channel();
        self.reload_tx = Some(reload_tx);
        self.watch_catalog();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        tracing::info!("Server started, waiting for requests...");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break,
                        Err(e) => {
                            tracing::error!("Error reading stdin: {}", e);
                            break;
                        }
                    };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let reply = self.handle_line(&line).await;
                    let reply_json = serde_json::to_string(&reply).unwrap_or_else(|e| {
                        json!({
                            "status": 500,
                            "body": { "error": "serialization", "message": e.to_string() }
                        })
                        .to_string()
                    });

                    stdout.write_all(reply_json.as_bytes()).await?;
                    stdout.write_all(b"\n").await?;
                    stdout.flush().await?;
                }
                Some(()) = reload_rx.recv() => {
                    self.reload_catalog().await;
                }
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}
