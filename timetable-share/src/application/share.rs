// =====================
// バージョン付きワイヤープロトコル
// =====================
//
// クエリ文字列の `v` (バージョン) と `t` (圧縮ペイロード) の2つだけが外部契約。
// 復元は全域関数で、どんな入力にも「使えるドキュメント」と任意の案内文を返す。

use tracing::{debug, warn};
use url::{form_urlencoded, Url};

use crate::application::dto::SharePayload;
use crate::application::error::ShareError;
use crate::application::payload::{from_payload, to_payload};
use crate::domain::models::Document;
use crate::domain::template::get_template_by_id;
use crate::infrastructure::compression::{compress, decompress};

pub const VERSION_PARAM: &str = "v";
pub const PAYLOAD_PARAM: &str = "t";

/// 共有URLの形式のバージョン
///
/// 今は1種類だけだが、復元はこのタグで分岐する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireVersion {
    V1,
}

impl WireVersion {
    pub const CURRENT: WireVersion = WireVersion::V1;

    pub fn as_str(self) -> &'static str {
        match self {
            WireVersion::V1 => "1",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "1" => Some(WireVersion::V1),
            _ => None,
        }
    }
}

/// `v` と `t` の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareParams {
    pub version: String,
    pub payload: String,
}

/// 復元結果。document は常にサニタイズ済み
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub document: Document,
    pub advisory: Option<String>,
}

impl DecodeOutcome {
    fn fallback(fallback_template: &str, advisory: Option<String>) -> Self {
        Self {
            document: get_template_by_id(fallback_template).default_document(),
            advisory,
        }
    }
}

// =====================
// 符号化
// =====================

pub fn encode_params(document: &Document) -> ShareParams {
    let payload = to_payload(document);
    // DTO は文字列と整数しか持たないので JSON 化は失敗しない
    let json = serde_json::to_string(&payload).unwrap_or_default();
    let compressed = compress(&json);
    debug!(
        json_len = json.len(),
        compressed_len = compressed.len(),
        "encoded share payload"
    );

    ShareParams {
        version: WireVersion::CURRENT.as_str().to_string(),
        payload: compressed,
    }
}

/// "v=1&t=..." 形式のクエリ文字列
pub fn encode(document: &Document) -> String {
    let params = encode_params(document);
    form_urlencoded::Serializer::new(String::new())
        .append_pair(VERSION_PARAM, &params.version)
        .append_pair(PAYLOAD_PARAM, &params.payload)
        .finish()
}

/// base の既存クエリを置き換えた共有URLを作る
pub fn build_share_url(base: &Url, document: &Document) -> Url {
    let mut url = base.clone();
    url.set_query(Some(&encode(document)));
    url
}

// =====================
// 復元
// =====================

/// 空文字のパラメータは「無い」ものとして扱う
pub fn decode_params(
    version: Option<&str>,
    payload: Option<&str>,
    fallback_template: &str,
) -> DecodeOutcome {
    let (Some(version), Some(payload)) = (
        version.filter(|v| !v.is_empty()),
        payload.filter(|p| !p.is_empty()),
    ) else {
        debug!("share parameters missing, using template default");
        return DecodeOutcome::fallback(fallback_template, None);
    };

    match try_decode(version, payload, fallback_template) {
        Ok(document) => DecodeOutcome {
            document,
            advisory: None,
        },
        Err(err) => {
            warn!(error = ?err, version, "failed to decode share link");
            DecodeOutcome::fallback(fallback_template, Some(err.advisory()))
        }
    }
}

fn try_decode(
    version: &str,
    payload: &str,
    fallback_template: &str,
) -> Result<Document, ShareError> {
    let version = WireVersion::parse(version)
        .ok_or_else(|| ShareError::UnsupportedVersion(version.to_string()))?;

    match version {
        WireVersion::V1 => {
            let json = decompress(payload).ok_or(ShareError::Decompress)?;
            let payload: SharePayload = serde_json::from_str(&json).map_err(ShareError::Payload)?;
            Ok(from_payload(payload, fallback_template))
        }
    }
}

/// クエリ文字列 ("?v=1&t=..." でも "v=1&t=..." でも可) から復元する
pub fn decode(query: &str, fallback_template: &str) -> DecodeOutcome {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut version = None;
    let mut payload = None;
    // 同じキーが複数あるときは最初のものを使う
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match &*key {
            VERSION_PARAM if version.is_none() => version = Some(value.into_owned()),
            PAYLOAD_PARAM if payload.is_none() => payload = Some(value.into_owned()),
            _ => {}
        }
    }
    decode_params(version.as_deref(), payload.as_deref(), fallback_template)
}

pub fn decode_url(url: &Url, fallback_template: &str) -> DecodeOutcome {
    decode(url.query().unwrap_or_default(), fallback_template)
}

#[cfg(test)]
mod share_tests {
    use super::*;

    #[test]
    fn test_version_token() {
        assert_eq!(WireVersion::parse("1"), Some(WireVersion::V1));
        assert_eq!(WireVersion::parse("2"), None);
        assert_eq!(WireVersion::CURRENT.as_str(), "1");
    }

    #[test]
    fn test_encode_query_shape() {
        let query = encode(&Document::default());
        assert!(query.starts_with("v=1&t="));
        // ペイロードはエスケープ不要な文字だけで構成される
        let payload = &query["v=1&t=".len()..];
        assert!(payload
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));
    }

    #[test]
    fn test_empty_params_are_missing() {
        let outcome = decode("v=&t=", "blank");
        assert_eq!(outcome.advisory, None);
        assert_eq!(outcome.document.meta.template_id, "blank");
    }

    #[test]
    fn test_build_share_url_replaces_query() {
        let base = Url::parse("https://example.com/app?old=1#top").unwrap();
        let url = build_share_url(&base, &Document::default());
        assert!(url.query().unwrap().starts_with("v=1&t="));
        assert_eq!(url.fragment(), Some("top"));
        let outcome = decode_url(&url, "blank");
        assert_eq!(outcome.advisory, None);
        assert_eq!(outcome.document, Document::default());
    }
}
