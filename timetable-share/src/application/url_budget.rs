// =====================
// URL長の目安
// =====================
//
// 共有URLの長さを safe / warn / danger の3段階に分ける。
// あくまで案内用で、長すぎてもURLの生成は止めない。

use url::Url;

use crate::application::share::build_share_url;
use crate::domain::models::Document;

/// これ以上で warn
pub const URL_WARN_THRESHOLD: usize = 1800;
/// これ以上で danger。割合表示の分母にも使う
pub const URL_DANGER_THRESHOLD: usize = 2000;

const WARN_MESSAGE: &str =
    "共有URLが長くなってきました。一部のアプリでリンクが切れる可能性があります。";
const DANGER_MESSAGE: &str =
    "共有URLがかなり長くなっています。メモや科目名を短くすると確実に共有できます。";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlBand {
    Safe,
    Warn,
    Danger,
}

impl UrlBand {
    pub fn from_length(length: usize) -> Self {
        if length >= URL_DANGER_THRESHOLD {
            UrlBand::Danger
        } else if length >= URL_WARN_THRESHOLD {
            UrlBand::Warn
        } else {
            UrlBand::Safe
        }
    }

    pub fn advisory(self) -> Option<&'static str> {
        match self {
            UrlBand::Safe => None,
            UrlBand::Warn => Some(WARN_MESSAGE),
            UrlBand::Danger => Some(DANGER_MESSAGE),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UrlBand::Safe => "safe",
            UrlBand::Warn => "warn",
            UrlBand::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBudget {
    pub length: usize,
    pub band: UrlBand,
    pub advisory: Option<&'static str>,
}

impl UrlBudget {
    pub fn percent(&self) -> u8 {
        budget_percent(self.length)
    }
}

/// 組み立て済みの共有URLを分類する
pub fn classify_url(url: &str) -> UrlBudget {
    let length = url.chars().count();
    let band = UrlBand::from_length(length);
    UrlBudget {
        length,
        band,
        advisory: band.advisory(),
    }
}

/// 編集中のドキュメントを今共有したときのURL長
pub fn candidate_length(base: &Url, document: &Document) -> usize {
    build_share_url(base, document).as_str().chars().count()
}

/// danger の閾値に対する使用率 (0..=100)
pub fn budget_percent(length: usize) -> u8 {
    (length.saturating_mul(100) / URL_DANGER_THRESHOLD).min(100) as u8
}
