//! サニタイザと共有URLの性質テスト
//!
//! 1. サニタイズは冪等
//! 2. サニタイズ後の結合ブロックは重ならず、時限数からはみ出さない
//! 3. encode -> decode でドキュメントが再現される (検索条件は共有設定に従う)
//! 4. 任意の文字列を復元しても必ずドキュメントが返る

use proptest::prelude::*;

use timetable_share_lib::{
    decode, decode_params, encode,
    domain::models::{Cell, Document, Filters, TimeRange, UiState, ViewTab, DAY_COUNT, MAX_PERIODS},
    get_template_by_id, list_templates, sanitize,
};

// ── Strategies ──────────────────────────────────────────────────────────

fn text_strategy(max: usize) -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        proptest::string::string_regex(&format!("[a-zA-Z0-9 あ-ん数学#]{{0,{max}}}")).unwrap(),
    ]
}

fn color_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "#[0-9a-fA-F]{6}",
        "[0-9a-fA-F]{6}",
        "#[0-9a-zA-Z]{0,7}",
    ]
}

fn time_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..24, 0u32..60).prop_map(|(h, m)| format!("{h:02}:{m:02}")),
        "[0-9:]{0,6}",
    ]
}

fn range_strategy() -> impl Strategy<Value = TimeRange> {
    (time_strategy(), time_strategy()).prop_map(|(start, end)| TimeRange { start, end })
}

fn cell_strategy() -> impl Strategy<Value = Cell> {
    (
        text_strategy(90),
        text_strategy(10),
        text_strategy(10),
        text_strategy(260),
        color_strategy(),
    )
        .prop_map(|(subject, teacher, room, memo, color)| Cell {
            subject,
            teacher,
            room,
            memo,
            color,
        })
}

fn grid_strategy<T: std::fmt::Debug>(
    slot: impl Strategy<Value = T>,
) -> impl Strategy<Value = [[T; MAX_PERIODS]; DAY_COUNT]> {
    proptest::collection::vec(proptest::collection::vec(slot, MAX_PERIODS), DAY_COUNT).prop_map(
        |rows: Vec<Vec<T>>| {
            let mut rows = rows.into_iter().map(|row| -> [T; MAX_PERIODS] {
                let mut row = row.into_iter();
                core::array::from_fn(|_| row.next().unwrap())
            });
            core::array::from_fn(|_| rows.next().unwrap())
        },
    )
}

fn filters_strategy() -> impl Strategy<Value = Filters> {
    (
        text_strategy(90),
        text_strategy(10),
        text_strategy(10),
        text_strategy(10),
        color_strategy(),
    )
        .prop_map(|(query, subject, teacher, room, color)| Filters {
            query,
            subject,
            teacher,
            room,
            color,
        })
}

fn ui_strategy() -> impl Strategy<Value = UiState> {
    (
        prop_oneof![Just(ViewTab::Week), Just(ViewTab::Day), Just(ViewTab::List)],
        0u8..10,
        any::<[bool; 4]>(),
    )
        .prop_map(|(tab, selected_day, flags)| UiState {
            tab,
            selected_day,
            mobile_week: flags[0],
            compact: flags[1],
            read_only: flags[2],
            filter_panel: flags[3],
        })
}

/// テンプレートの既定ドキュメントを出発点に、あらゆる項目をでたらめにした候補
fn document_strategy() -> impl Strategy<Value = Document> {
    let template_ids: Vec<&'static str> = list_templates().iter().map(|t| t.id).collect();
    (
        proptest::sample::select(template_ids),
        text_strategy(100),
        proptest::collection::vec(0u8..12, 0..10),
        0u8..12,
        any::<bool>(),
        proptest::collection::vec(range_strategy(), MAX_PERIODS),
        grid_strategy(proptest::option::weighted(0.2, range_strategy())),
        grid_strategy(prop_oneof![4 => Just(Cell::default()), 1 => cell_strategy()]),
        grid_strategy(proptest::option::weighted(0.2, 0u8..10)),
        filters_strategy(),
        ui_strategy(),
    )
        .prop_map(
            |(template_id, title, days, count, share, times, overrides, cells, merges, filters, ui)| {
                let mut doc = get_template_by_id(template_id).default_document();
                doc.meta.title = title;
                doc.meta.active_days = days;
                doc.meta.period_count = count;
                doc.meta.share_filters = share;
                let mut times = times.into_iter();
                doc.period_times = core::array::from_fn(|_| times.next().unwrap());
                doc.day_overrides = overrides;
                doc.cells = cells;
                doc.merges = merges;
                doc.filters = filters;
                doc.ui = ui;
                doc
            },
        )
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn sanitize_is_idempotent(doc in document_strategy()) {
        let once = sanitize(doc);
        let twice = sanitize(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merges_never_overlap(doc in document_strategy()) {
        let doc = sanitize(doc);
        let count = doc.meta.period_count as usize;
        for row in &doc.merges {
            let mut claimed_until = 0usize;
            for (start, span) in row.iter().enumerate() {
                if let Some(span) = span {
                    let span = *span as usize;
                    prop_assert!(span >= 2);
                    prop_assert!(start + 1 > claimed_until, "overlap at {}", start + 1);
                    prop_assert!(start + span <= count, "block past period count");
                    claimed_until = start + span;
                }
            }
        }
    }

    #[test]
    fn encode_decode_round_trip(doc in document_strategy()) {
        let sanitized = sanitize(doc);
        let restored = decode(&encode(&sanitized), "blank").document;

        prop_assert_eq!(&restored.cells, &sanitized.cells);
        prop_assert_eq!(&restored.day_overrides, &sanitized.day_overrides);
        prop_assert_eq!(&restored.merges, &sanitized.merges);
        prop_assert_eq!(&restored.period_times, &sanitized.period_times);
        prop_assert_eq!(&restored.meta, &sanitized.meta);
        prop_assert_eq!(&restored.ui, &sanitized.ui);
        if sanitized.meta.share_filters {
            prop_assert_eq!(&restored.filters, &sanitized.filters);
        } else {
            prop_assert!(restored.filters.is_empty());
        }
    }

    #[test]
    fn decode_is_total(version in "[0-9a-z]{0,3}", payload in "[A-Za-z0-9_%-]{0,64}") {
        let outcome = decode_params(Some(&version), Some(&payload), "university");
        // 何を渡してもサニタイズ済みのドキュメントが返る
        prop_assert_eq!(sanitize(outcome.document.clone()), outcome.document);
        if version != "1" && !version.is_empty() && !payload.is_empty() {
            prop_assert!(outcome.advisory.is_some());
        }
    }
}
