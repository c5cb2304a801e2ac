use thiserror::Error;

/// 共有リンクの復元中に起きる失敗
///
/// 復元の入口 (`decode_*`) で必ず捕まえ、既定のドキュメントと
/// 利用者向けの案内文に変換する。外へは出ていかない。
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("共有リンクのバージョン「{0}」には対応していません")]
    UnsupportedVersion(String),

    #[error("共有リンクのデータを展開できませんでした")]
    Decompress,

    #[error("共有リンクのデータを読み取れませんでした")]
    Payload(#[source] serde_json::Error),
}

impl ShareError {
    /// 画面に出す案内文
    pub fn advisory(&self) -> String {
        format!("{self}。既定の時間割を表示しています。")
    }
}
