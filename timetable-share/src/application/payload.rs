// =====================
// 圧縮前ペイロードとドキュメントの相互変換
// =====================

use std::collections::BTreeMap;

use crate::application::dto::{CellDto, DayMap, FiltersDto, MetaDto, RangeDto, SharePayload, UiDto};
use crate::domain::models::{
    empty_grid, slot_index, Cell, Document, Filters, Grid, TimeRange, ViewTab,
    DEFAULT_CELL_COLOR, DEFAULT_TITLE, MAX_PERIODS,
};
use crate::domain::sanitize::sanitize;
use tracing::warn;

use crate::domain::template::{find_template, get_template_by_id};

fn range_dto(time: &TimeRange) -> RangeDto {
    RangeDto(time.start.clone(), time.end.clone())
}

fn cell_dto(cell: &Cell) -> CellDto {
    // 既定色は空文字で表す (復元時のサニタイズで既定色に戻る)
    let color = if cell.color == DEFAULT_CELL_COLOR {
        String::new()
    } else {
        cell.color.clone()
    };
    CellDto(
        cell.subject.clone(),
        cell.teacher.clone(),
        cell.room.clone(),
        cell.memo.clone(),
        color,
    )
}

fn flag(value: bool) -> i64 {
    value as i64
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// グリッドから値のあるスロットだけを day -> period の疎なマップにする
fn collect_day_map<T, U>(grid: &Grid<T>, mut pick: impl FnMut(&T) -> Option<U>) -> DayMap<U> {
    let mut map = DayMap::new();
    for (d, row) in grid.iter().enumerate() {
        let periods: BTreeMap<String, U> = row
            .iter()
            .enumerate()
            .filter_map(|(p, value)| pick(value).map(|v| ((p + 1).to_string(), v)))
            .collect();
        if !periods.is_empty() {
            map.insert(d.to_string(), periods);
        }
    }
    map
}

/// 疎なマップをグリッドへ戻す。数値として読めないキーや範囲外のキーは読み飛ばす
fn spread_day_map<T, U>(map: DayMap<T>, grid: &mut Grid<U>, mut put: impl FnMut(T) -> U) {
    for (day_key, periods) in map {
        let Ok(day) = day_key.parse::<u8>() else { continue };
        for (period_key, value) in periods {
            let Ok(period) = period_key.parse::<u8>() else { continue };
            if let Some((d, p)) = slot_index(day, period) {
                grid[d][p] = put(value);
            }
        }
    }
}

/// ドキュメントを共有ペイロードにする
///
/// 先にサニタイズしてから、既定値と同じものや空のものを省いて書き出す。
pub fn to_payload(document: &Document) -> SharePayload {
    let doc = sanitize(document.clone());
    let template = get_template_by_id(&doc.meta.template_id);

    let meta = MetaDto {
        a: Some(doc.meta.active_days.iter().map(|&d| d as i64).collect()),
        p: Some(doc.meta.period_count as i64),
        t: Some(doc.meta.template_id.clone()),
        n: (doc.meta.title != DEFAULT_TITLE).then(|| doc.meta.title.clone()),
        sf: doc.meta.share_filters.then_some(1),
    };

    let overrides = collect_day_map(&doc.day_overrides, |slot| slot.as_ref().map(range_dto));
    let cells = collect_day_map(&doc.cells, |cell| cell.has_content().then(|| cell_dto(cell)));
    let merges = collect_day_map(&doc.merges, |span| span.filter(|s| *s >= 2).map(i64::from));

    // 復元はテンプレートの既定の上に重ねるので、テンプレートが最初から
    // コマや結合を持つ場合は空でも明示的に書き出して上書きさせる
    let c = (!cells.is_empty() || template.has_prefilled_cells()).then_some(cells);
    let g = (!merges.is_empty() || template.has_merges()).then_some(merges);

    let f = doc.meta.share_filters.then(|| FiltersDto {
        q: non_empty(&doc.filters.query),
        s: non_empty(&doc.filters.subject),
        t: non_empty(&doc.filters.teacher),
        r: non_empty(&doc.filters.room),
        c: non_empty(&doc.filters.color),
    });

    let u = UiDto {
        t: Some(doc.ui.tab.code().to_string()),
        d: Some(doc.ui.selected_day as i64),
        mw: Some(flag(doc.ui.mobile_week)),
        cp: Some(flag(doc.ui.compact)),
        ro: Some(flag(doc.ui.read_only)),
        fp: Some(flag(doc.ui.filter_panel)),
    };

    SharePayload {
        m: Some(meta),
        p: Some(doc.period_times.iter().map(range_dto).collect()),
        o: (!overrides.is_empty()).then_some(overrides),
        c,
        g,
        f,
        u: Some(u),
    }
}

/// 共有ペイロードからドキュメントを復元する
///
/// まず参照されているテンプレート (無い・知らないIDなら fallback_template) の既定ドキュメントを作り、
/// ペイロードにある項目だけを上に重ねる。欠けている項目はテンプレートの既定のまま。
/// 最後に必ずサニタイズを通す。
pub fn from_payload(payload: SharePayload, fallback_template: &str) -> Document {
    let meta = payload.m.unwrap_or_default();
    let template = match meta.t.as_deref() {
        Some(id) => find_template(id).unwrap_or_else(|| {
            warn!(template_id = id, fallback_template, "unknown template id in share payload");
            get_template_by_id(fallback_template)
        }),
        None => get_template_by_id(fallback_template),
    };
    let mut doc = template.default_document();

    // --- meta ---
    if let Some(days) = meta.a {
        doc.meta.active_days = days.into_iter().filter_map(|d| u8::try_from(d).ok()).collect();
    }
    if let Some(count) = meta.p {
        doc.meta.period_count = count.clamp(0, u8::MAX as i64) as u8;
    }
    if let Some(title) = meta.n {
        doc.meta.title = title;
    }
    doc.meta.share_filters = meta.sf.is_some_and(|v| v != 0);

    // --- 時刻 ---
    if let Some(times) = payload.p {
        for (index, RangeDto(start, end)) in times.into_iter().take(MAX_PERIODS).enumerate() {
            doc.period_times[index] = TimeRange { start, end };
        }
    }
    if let Some(overrides) = payload.o {
        doc.day_overrides = empty_grid();
        spread_day_map(overrides, &mut doc.day_overrides, |RangeDto(start, end)| {
            Some(TimeRange { start, end })
        });
    }

    // --- コマ / 結合 ---
    if let Some(cells) = payload.c {
        doc.cells = empty_grid();
        spread_day_map(cells, &mut doc.cells, |CellDto(subject, teacher, room, memo, color)| {
            Cell {
                subject,
                teacher,
                room,
                memo,
                color,
            }
        });
    }
    if let Some(merges) = payload.g {
        doc.merges = empty_grid();
        spread_day_map(merges, &mut doc.merges, |span| {
            Some(span.clamp(0, u8::MAX as i64) as u8)
        });
    }

    // --- 検索条件 (共有する設定のときだけ) ---
    if doc.meta.share_filters {
        if let Some(f) = payload.f {
            doc.filters = Filters {
                query: f.q.unwrap_or_default(),
                subject: f.s.unwrap_or_default(),
                teacher: f.t.unwrap_or_default(),
                room: f.r.unwrap_or_default(),
                color: f.c.unwrap_or_default(),
            };
        }
    }

    // --- 表示状態 ---
    if let Some(ui) = payload.u {
        if let Some(tab) = ui.t.as_deref().and_then(ViewTab::from_code) {
            doc.ui.tab = tab;
        }
        if let Some(day) = ui.d.and_then(|d| u8::try_from(d).ok()) {
            doc.ui.selected_day = day;
        }
        let read_flag = |value: Option<i64>, current: bool| value.map_or(current, |v| v != 0);
        doc.ui.mobile_week = read_flag(ui.mw, doc.ui.mobile_week);
        doc.ui.compact = read_flag(ui.cp, doc.ui.compact);
        doc.ui.read_only = read_flag(ui.ro, doc.ui.read_only);
        doc.ui.filter_panel = read_flag(ui.fp, doc.ui.filter_panel);
    }

    sanitize(doc)
}

#[cfg(test)]
mod payload_tests {
    use super::*;

    #[test]
    fn test_empty_document_is_minimal() {
        let doc = get_template_by_id("university").default_document();
        let payload = to_payload(&doc);
        assert!(payload.o.is_none());
        assert!(payload.c.is_none());
        assert!(payload.g.is_none());
        assert!(payload.f.is_none());
        assert!(payload.u.is_some());
        let meta = payload.m.as_ref().unwrap();
        assert_eq!(meta.n, None);
        assert_eq!(meta.sf, None);
        assert_eq!(payload.p.as_ref().unwrap().len(), MAX_PERIODS);
    }

    #[test]
    fn test_wire_shape_uses_tuples() {
        let mut doc = get_template_by_id("university").default_document();
        doc.set_cell(1, 1, Cell::new("統計学", "永井教授", "B201", "毎週小テスト", "#123abc"));
        doc.set_day_override(1, 1, Some(TimeRange::new("08:45", "10:15")));
        let json = serde_json::to_value(to_payload(&doc)).unwrap();

        assert_eq!(
            json["c"]["1"]["1"],
            serde_json::json!(["統計学", "永井教授", "B201", "毎週小テスト", "#123ABC"])
        );
        assert_eq!(json["o"]["1"]["1"], serde_json::json!(["08:45", "10:15"]));
        assert_eq!(json["p"][0], serde_json::json!(["09:00", "10:30"]));
        assert_eq!(json["m"]["t"], "university");
        assert_eq!(json["u"]["t"], "w");
    }

    #[test]
    fn test_cleared_template_cells_survive_round_trip() {
        let mut doc = get_template_by_id("high_school").default_document();
        doc.clear_cell(0, 1);
        doc.clear_cell(4, 6);
        let payload = to_payload(&doc);
        assert_eq!(payload.c, Some(DayMap::new()));

        let restored = from_payload(payload, "university");
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_partial_payload_keeps_template_defaults() {
        let payload: SharePayload =
            serde_json::from_str(r#"{"m":{"t":"cram_school"},"p":[["15:00","15:45"]]}"#).unwrap();
        let doc = from_payload(payload, "university");
        let template = get_template_by_id("cram_school").default_document();

        assert_eq!(doc.meta.template_id, "cram_school");
        assert_eq!(doc.meta.period_count, template.meta.period_count);
        assert_eq!(doc.period_times[0], TimeRange::new("15:00", "15:45"));
        assert_eq!(doc.period_times[1], template.period_times[1]);
        assert_eq!(doc.cells, template.cells);
        assert_eq!(doc.merges, template.merges);
    }

    #[test]
    fn test_hostile_values_are_repaired() {
        let payload: SharePayload = serde_json::from_str(
            r#"{
                "m": {"a": [-1, 3, 3, 99], "p": 1000, "t": "university"},
                "c": {"x": {"1": ["a","b","c","d","e"]}, "2": {"9": ["a","","","",""], "2": ["数学","","","","nothex"]}},
                "g": {"2": {"1": 999, "2": 2}},
                "u": {"t": "zz", "d": 42}
            }"#,
        )
        .unwrap();
        let doc = from_payload(payload, "university");

        assert_eq!(doc.meta.active_days, vec![3]);
        assert_eq!(doc.meta.period_count, 8);
        assert_eq!(doc.cell(2, 2).unwrap().color, DEFAULT_CELL_COLOR);
        // 1限から8限までの結合が先に採用され、2限開始の候補は捨てられる
        assert_eq!(doc.merge_span(2, 1), Some(8));
        assert_eq!(doc.merge_span(2, 2), None);
        assert_eq!(doc.ui.tab, ViewTab::Week);
        assert_eq!(doc.ui.selected_day, 3);
    }

    #[test]
    fn test_unknown_template_uses_fallback() {
        let payload: SharePayload =
            serde_json::from_str(r#"{"m":{"t":"nope","p":3},"c":{"0":{"1":["国語","","","",""]}}}"#)
                .unwrap();
        let doc = from_payload(payload, "blank");

        assert_eq!(doc.meta.template_id, "blank");
        assert_eq!(doc.meta.period_count, 3);
        assert_eq!(doc.cell(0, 1).unwrap().subject, "国語");
    }

    #[test]
    fn test_filters_ignored_without_share_flag() {
        let payload: SharePayload =
            serde_json::from_str(r#"{"m":{"t":"university","sf":0},"f":{"q":"数学"}}"#).unwrap();
        let doc = from_payload(payload, "university");
        assert!(doc.filters.is_empty());
    }
}
