// =====================
// 共有ペイロード (圧縮前) の形
// =====================
//
// キーは URL を短くするための1〜2文字のトークン。
// 時刻範囲とコマは位置で意味が決まる配列として書き出すので、
// 要素の順番はワイヤー契約の一部であり変えてはいけない。
//
// 復元側はどの項目が欠けていても読めるように、すべて Option にしている。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// day -> period -> T (キーは10進数の文字列)
pub type DayMap<T> = BTreeMap<String, BTreeMap<String, T>>;

/// [start, end]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeDto(pub String, pub String);

/// [subject, teacher, room, memo, color]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDto(pub String, pub String, pub String, pub String, pub String);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaDto {
    /// 表示する曜日
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<Vec<i64>>,
    /// 時限数
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<i64>,
    /// テンプレートID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    /// タイトル (既定のときは省略)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// 検索条件を共有するか (0|1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sf: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiDto {
    /// タブコード
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
    /// 選択中の曜日
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mw: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ro: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp: Option<i64>,
}

/// 共有ペイロード全体 (バージョン "1")
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<MetaDto>,
    /// 1限〜8限の既定時刻
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<Vec<RangeDto>>,
    /// 既定と異なる曜日別の時刻
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<DayMap<RangeDto>>,
    /// 内容のあるコマ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<DayMap<CellDto>>,
    /// span >= 2 の結合
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g: Option<DayMap<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<FiltersDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub u: Option<UiDto>,
}
