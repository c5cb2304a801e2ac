// =====================
// ドメインモデル定義
// =====================

use serde::{Deserialize, Serialize};

// 曜日インデックスと時限番号の型エイリアス
pub type DayIndex = u8; // 0:Mon - 6:Sun
pub type Period = u8; // 1始まり (1..=8)

pub const DAY_COUNT: usize = 7;
pub const MAX_PERIODS: usize = 8;

pub const MAX_TEXT_LEN: usize = 80;
pub const MAX_MEMO_LEN: usize = 240;

/// 色が未指定・不正なときに使うアクセントカラー
pub const DEFAULT_CELL_COLOR: &str = "#4F7CFF";
pub const DEFAULT_TITLE: &str = "マイ時間割";
/// 有効な曜日が一つも残らなかったときの曜日 (月曜)
pub const DEFAULT_DAY: DayIndex = 0;

/// 曜日 x 時限 の固定長グリッド
pub type Grid<T> = [[T; MAX_PERIODS]; DAY_COUNT];

pub fn empty_grid<T: Default>() -> Grid<T> {
    core::array::from_fn(|_| core::array::from_fn(|_| T::default()))
}

/// (day, period) を配列インデックスへ変換する。範囲外は None
pub(crate) fn slot_index(day: DayIndex, period: Period) -> Option<(usize, usize)> {
    let day = day as usize;
    let period = period as usize;
    if day < DAY_COUNT && (1..=MAX_PERIODS).contains(&period) {
        Some((day, period - 1))
    } else {
        None
    }
}

/// 時刻範囲 (24時間表記 "HH:MM")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }
}

/// 1コマ分の内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cell {
    pub subject: String,
    pub teacher: String,
    pub room: String,
    pub memo: String,
    pub color: String,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            subject: String::new(),
            teacher: String::new(),
            room: String::new(),
            memo: String::new(),
            color: DEFAULT_CELL_COLOR.to_string(),
        }
    }
}

impl Cell {
    pub fn new(subject: &str, teacher: &str, room: &str, memo: &str, color: &str) -> Self {
        Self {
            subject: subject.to_string(),
            teacher: teacher.to_string(),
            room: room.to_string(),
            memo: memo.to_string(),
            color: color.to_string(),
        }
    }

    /// 共有URLに載せる価値のある内容を持っているか
    pub fn has_content(&self) -> bool {
        !self.subject.is_empty()
            || !self.teacher.is_empty()
            || !self.room.is_empty()
            || !self.memo.is_empty()
            || !self.color.eq_ignore_ascii_case(DEFAULT_CELL_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub title: String,
    pub active_days: Vec<DayIndex>,
    pub period_count: u8,
    pub template_id: String,
    /// 共有URLに検索条件を含めるか
    pub share_filters: bool,
}

/// 検索条件 (一時的な状態)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub query: String,
    pub subject: String,
    pub teacher: String,
    pub room: String,
    /// 空文字は「色で絞り込まない」
    pub color: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewTab {
    #[default]
    Week,
    Day,
    List,
}

impl ViewTab {
    /// URL上の短いタブコード
    pub fn code(self) -> &'static str {
        match self {
            ViewTab::Week => "w",
            ViewTab::Day => "d",
            ViewTab::List => "l",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "w" => Some(ViewTab::Week),
            "d" => Some(ViewTab::Day),
            "l" => Some(ViewTab::List),
            _ => None,
        }
    }
}

/// 表示状態。共有リンクで同じ見た目を再現するため URL に含める
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiState {
    pub tab: ViewTab,
    pub selected_day: DayIndex,
    /// 狭い画面でも1週間分を並べる
    pub mobile_week: bool,
    pub compact: bool,
    pub read_only: bool,
    pub filter_panel: bool,
}

/// 時間割ドキュメント（メイン構造体）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub meta: Meta,
    /// 時限ごとの既定時刻 (index 0 = 1限)
    pub period_times: [TimeRange; MAX_PERIODS],
    /// 曜日ごとの時刻上書き。None は既定時刻を使う
    pub day_overrides: Grid<Option<TimeRange>>,
    pub cells: Grid<Cell>,
    /// 結合ブロックの開始位置に span を持つ
    pub merges: Grid<Option<u8>>,
    pub filters: Filters,
    pub ui: UiState,
}

impl Default for Document {
    fn default() -> Self {
        crate::domain::template::default_template().default_document()
    }
}

impl Document {
    pub fn cell(&self, day: DayIndex, period: Period) -> Option<&Cell> {
        slot_index(day, period).map(|(d, p)| &self.cells[d][p])
    }

    pub fn period_time(&self, period: Period) -> Option<&TimeRange> {
        slot_index(0, period).map(|(_, p)| &self.period_times[p])
    }

    pub fn day_override(&self, day: DayIndex, period: Period) -> Option<&TimeRange> {
        slot_index(day, period).and_then(|(d, p)| self.day_overrides[d][p].as_ref())
    }

    /// 上書きがあればそれを、なければ時限の既定時刻を返す
    pub fn effective_time(&self, day: DayIndex, period: Period) -> Option<&TimeRange> {
        self.day_override(day, period)
            .or_else(|| self.period_time(period))
    }

    pub fn merge_span(&self, day: DayIndex, period: Period) -> Option<u8> {
        slot_index(day, period).and_then(|(d, p)| self.merges[d][p])
    }

    /// 指定コマを覆っている結合ブロック (開始時限, span) を探す
    pub fn merge_covering(&self, day: DayIndex, period: Period) -> Option<(Period, u8)> {
        let (d, p) = slot_index(day, period)?;
        self.merges[d][..=p]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(start, span)| match span {
                Some(span) if start + *span as usize > p => Some((start as Period + 1, *span)),
                _ => None,
            })
    }

    pub fn is_active_day(&self, day: DayIndex) -> bool {
        self.meta.active_days.contains(&day)
    }
}
