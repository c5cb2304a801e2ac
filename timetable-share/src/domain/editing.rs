// =====================
// ドキュメント編集操作
// =====================
//
// どの操作も最後にサニタイズを通すので、呼び出し側が不正な値を渡しても
// ドキュメントは常に不変条件を満たす。範囲外の (day, period) は無視する。

use crate::domain::models::{
    slot_index, Cell, DayIndex, Document, Filters, Period, TimeRange, UiState, MAX_PERIODS,
};
use crate::domain::sanitize::sanitize;
use crate::domain::template::get_template_by_id;

impl Document {
    fn resanitize(&mut self) {
        *self = sanitize(self.clone());
    }

    pub fn set_title(&mut self, title: &str) {
        self.meta.title = title.to_string();
        self.resanitize();
    }

    /// テンプレートを適用し直す。これまでの内容は破棄される
    pub fn apply_template(&mut self, template_id: &str) {
        *self = get_template_by_id(template_id).default_document();
    }

    /// 現在のテンプレートの初期状態へ戻す
    pub fn reset(&mut self) {
        let template_id = self.meta.template_id.clone();
        self.apply_template(&template_id);
    }

    pub fn set_active_days(&mut self, days: &[DayIndex]) {
        self.meta.active_days = days.to_vec();
        self.resanitize();
    }

    pub fn set_period_count(&mut self, count: u8) {
        self.meta.period_count = count;
        self.resanitize();
    }

    pub fn set_cell(&mut self, day: DayIndex, period: Period, cell: Cell) {
        if let Some((d, p)) = slot_index(day, period) {
            self.cells[d][p] = cell;
            self.resanitize();
        }
    }

    pub fn clear_cell(&mut self, day: DayIndex, period: Period) {
        self.set_cell(day, period, Cell::default());
    }

    pub fn set_period_time(&mut self, period: Period, time: TimeRange) {
        if let Some((_, p)) = slot_index(0, period) {
            self.period_times[p] = time;
            self.resanitize();
        }
    }

    /// None で上書きを解除する
    pub fn set_day_override(&mut self, day: DayIndex, period: Period, time: Option<TimeRange>) {
        if let Some((d, p)) = slot_index(day, period) {
            self.day_overrides[d][p] = time;
            self.resanitize();
        }
    }

    /// 結合ブロックを作る (span < 2 なら解除)
    ///
    /// 新しいブロックと重なる既存ブロックは外し、
    /// 覆われるコマには開始コマの内容を写す。
    pub fn set_merge_span(&mut self, day: DayIndex, period: Period, span: u8) {
        let Some((d, p)) = slot_index(day, period) else {
            return;
        };

        if span < 2 {
            self.merges[d][p] = None;
            self.resanitize();
            return;
        }

        let end = (p + span as usize).min(MAX_PERIODS);
        for other in 0..MAX_PERIODS {
            if other == p {
                continue;
            }
            if let Some(other_span) = self.merges[d][other] {
                let other_end = other + other_span as usize;
                if other < end && p < other_end {
                    self.merges[d][other] = None;
                }
            }
        }
        self.merges[d][p] = Some(span);
        self.resanitize();
        self.mirror_merge(day, period);
    }

    /// 結合ブロックの開始コマの内容を覆われたコマへ写す
    ///
    /// 開始コマを後から編集したときの同期は呼び出し側が行う。
    pub fn mirror_merge(&mut self, day: DayIndex, period: Period) {
        let Some((d, p)) = slot_index(day, period) else {
            return;
        };
        if let Some(span) = self.merges[d][p] {
            let source = self.cells[d][p].clone();
            let end = (p + span as usize).min(MAX_PERIODS);
            for covered in p + 1..end {
                self.cells[d][covered] = source.clone();
            }
        }
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.resanitize();
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(Filters::default());
    }

    pub fn set_share_filters(&mut self, share_filters: bool) {
        self.meta.share_filters = share_filters;
    }

    pub fn set_ui(&mut self, ui: UiState) {
        self.ui = ui;
        self.resanitize();
    }
}
