// =====================
// サニタイザ
// =====================
//
// どんな入力でも不変条件を満たすドキュメントへ直す。
// 失敗は返さず、直せない項目は個別に既定値へ戻す。

use crate::domain::models::{
    Cell, DayIndex, Document, Filters, Grid, Meta, TimeRange, UiState, DAY_COUNT,
    DEFAULT_CELL_COLOR, DEFAULT_DAY, DEFAULT_TITLE, MAX_MEMO_LEN, MAX_PERIODS, MAX_TEXT_LEN,
};
use crate::domain::template::{find_template, DEFAULT_TEMPLATE_ID};
use crate::domain::time::builtin_period_time;

pub fn sanitize(document: Document) -> Document {
    let Document {
        meta,
        period_times,
        day_overrides,
        cells,
        merges,
        filters,
        ui,
    } = document;

    let meta = sanitize_meta(meta);
    let count = meta.period_count as usize;
    let period_times = sanitize_period_times(period_times);
    let day_overrides = sanitize_overrides(day_overrides, &period_times, count);
    let cells = sanitize_cells(cells, count);
    let merges = sanitize_merges(merges, count);
    let filters = sanitize_filters(filters);
    let ui = sanitize_ui(ui, &meta.active_days);

    Document {
        meta,
        period_times,
        day_overrides,
        cells,
        merges,
        filters,
        ui,
    }
}

impl Document {
    pub fn sanitized(self) -> Self {
        sanitize(self)
    }
}

/// 文字数 (バイト数ではない) で切り詰める
pub fn clamp_text(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}

/// "#RRGGBB" / "RRGGBB" を大文字の "#RRGGBB" にそろえる。不正なら None
pub fn normalize_color(value: &str) -> Option<String> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        Some(format!("#{}", hex.to_ascii_uppercase()))
    } else {
        None
    }
}

pub fn sanitize_title(title: &str) -> String {
    // 切り詰めた末尾に空白が残ると二回目で結果が変わるので最後にもう一度削る
    let title = clamp_text(title.trim(), MAX_TEXT_LEN);
    let title = title.trim_end();
    if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// 0..=6 に絞り、重複を除いて昇順に並べる。空なら既定の曜日
pub fn normalize_days<I: IntoIterator<Item = DayIndex>>(days: I) -> Vec<DayIndex> {
    let mut days: Vec<DayIndex> = days
        .into_iter()
        .filter(|day| (*day as usize) < DAY_COUNT)
        .collect();
    days.sort_unstable();
    days.dedup();
    if days.is_empty() {
        days.push(DEFAULT_DAY);
    }
    days
}

pub fn clamp_period_count(count: u8) -> u8 {
    count.clamp(1, MAX_PERIODS as u8)
}

fn sanitize_meta(meta: Meta) -> Meta {
    let template_id = if find_template(&meta.template_id).is_some() {
        meta.template_id
    } else {
        DEFAULT_TEMPLATE_ID.to_string()
    };

    Meta {
        title: sanitize_title(&meta.title),
        active_days: normalize_days(meta.active_days),
        period_count: clamp_period_count(meta.period_count),
        template_id,
        share_filters: meta.share_filters,
    }
}

fn sanitize_period_times(times: [TimeRange; MAX_PERIODS]) -> [TimeRange; MAX_PERIODS] {
    let mut index = 0;
    times.map(|time| {
        let fixed = if time.is_valid() {
            time
        } else {
            builtin_period_time(index)
        };
        index += 1;
        fixed
    })
}

/// 上書きは「正しい範囲」かつ「既定時刻と違う」ものだけ残す
fn sanitize_overrides(
    overrides: Grid<Option<TimeRange>>,
    period_times: &[TimeRange; MAX_PERIODS],
    count: usize,
) -> Grid<Option<TimeRange>> {
    overrides.map(|day| {
        let mut p = 0;
        day.map(|slot| {
            let kept = slot.filter(|time| {
                p < count && time.is_valid() && *time != period_times[p]
            });
            p += 1;
            kept
        })
    })
}

pub fn sanitize_cell(cell: Cell) -> Cell {
    Cell {
        subject: clamp_text(&cell.subject, MAX_TEXT_LEN),
        teacher: clamp_text(&cell.teacher, MAX_TEXT_LEN),
        room: clamp_text(&cell.room, MAX_TEXT_LEN),
        memo: clamp_text(&cell.memo, MAX_MEMO_LEN),
        color: normalize_color(&cell.color).unwrap_or_else(|| DEFAULT_CELL_COLOR.to_string()),
    }
}

fn sanitize_cells(cells: Grid<Cell>, count: usize) -> Grid<Cell> {
    cells.map(|day| {
        let mut p = 0;
        day.map(|cell| {
            let fixed = if p < count {
                sanitize_cell(cell)
            } else {
                Cell::default()
            };
            p += 1;
            fixed
        })
    })
}

/// 結合ブロックの重なりを解消する
///
/// 開始時限の昇順に見ていき、span を時限数に収まるよう縮める。
/// すでに採用したブロックの範囲内から始まる候補は捨てるので、
/// 採用されたブロック同士は決して重ならない。
fn sanitize_merges(merges: Grid<Option<u8>>, count: usize) -> Grid<Option<u8>> {
    merges.map(|day| {
        let mut accepted = [None; MAX_PERIODS];
        // 採用済みブロックが覆う最後の時限 (0始まり)
        let mut claimed_until: Option<usize> = None;

        for (start, span) in day.iter().enumerate() {
            let Some(span) = *span else { continue };
            if start >= count {
                break;
            }
            if claimed_until.is_some_and(|end| start <= end) {
                continue;
            }
            let span = (span as usize).min(count - start);
            if span < 2 {
                continue;
            }
            accepted[start] = Some(span as u8);
            claimed_until = Some(start + span - 1);
        }
        accepted
    })
}

fn sanitize_filters(filters: Filters) -> Filters {
    Filters {
        query: clamp_text(&filters.query, MAX_TEXT_LEN),
        subject: clamp_text(&filters.subject, MAX_TEXT_LEN),
        teacher: clamp_text(&filters.teacher, MAX_TEXT_LEN),
        room: clamp_text(&filters.room, MAX_TEXT_LEN),
        color: normalize_color(&filters.color).unwrap_or_default(),
    }
}

/// 選択中の曜日が表示対象外なら先頭の曜日へ寄せる
fn sanitize_ui(ui: UiState, active_days: &[DayIndex]) -> UiState {
    let selected_day = if active_days.contains(&ui.selected_day) {
        ui.selected_day
    } else {
        active_days.first().copied().unwrap_or(DEFAULT_DAY)
    };
    UiState { selected_day, ..ui }
}
