use url::Url;

pub mod domain;
pub mod infrastructure;
pub mod application;

pub use application::share::{
    build_share_url, decode, decode_params, decode_url, encode, encode_params, DecodeOutcome,
    ShareParams, WireVersion,
};
pub use application::url_budget::{classify_url, UrlBand, UrlBudget};
pub use domain::models::{Cell, Document, Filters, TimeRange, UiState, ViewTab};
pub use domain::sanitize::sanitize;
pub use domain::template::{get_template_by_id, list_templates, Template, DEFAULT_TEMPLATE_ID};

pub const DEFAULT_BASE_URL: &str = "https://example.com/timetable";

// =====================
// 設定
// =====================
#[derive(Debug, Clone)]
pub struct ShareConfig {
    /// 共有URLの土台 (クエリは置き換える)
    pub base_url: Url,
    /// 共有リンクが読めないときに表示するテンプレート
    pub fallback_template: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
            fallback_template: DEFAULT_TEMPLATE_ID.to_string(),
        }
    }
}

// 設定を保持して共有操作をまとめるコンテナ
pub struct ShareService {
    config: ShareConfig,
}

impl ShareService {
    pub fn new(config: ShareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShareConfig {
        &self.config
    }

    pub fn share_url(&self, document: &Document) -> Url {
        build_share_url(&self.config.base_url, document)
    }

    pub fn decode_url(&self, url: &Url) -> DecodeOutcome {
        decode_url(url, &self.config.fallback_template)
    }

    pub fn decode_query(&self, query: &str) -> DecodeOutcome {
        decode(query, &self.config.fallback_template)
    }

    /// 完全なURLでもクエリ文字列だけでも受け付ける
    pub fn decode_input(&self, input: &str) -> DecodeOutcome {
        match Url::parse(input.trim()) {
            Ok(url) => self.decode_url(&url),
            Err(_) => self.decode_query(input.trim()),
        }
    }

    pub fn inspect_url(&self, url: &str) -> UrlBudget {
        classify_url(url)
    }

    pub fn candidate_length(&self, document: &Document) -> usize {
        application::url_budget::candidate_length(&self.config.base_url, document)
    }

    /// 新しいドキュメントはフォールバック用テンプレートから作る
    pub fn new_document(&self) -> Document {
        get_template_by_id(&self.config.fallback_template).default_document()
    }
}
