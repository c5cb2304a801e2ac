// =====================
// テンプレート集
// =====================

use crate::domain::models::{
    empty_grid, slot_index, Cell, DayIndex, Document, Grid, Meta, Period, TimeRange, UiState,
    DEFAULT_TITLE, MAX_PERIODS,
};
use crate::domain::sanitize::sanitize;
use crate::domain::time::BUILTIN_PERIOD_TIMES;

pub const DEFAULT_TEMPLATE_ID: &str = "university";

// --- 1. テンプレートに最初から入っているコマ ---
#[derive(Debug, Clone, Copy)]
pub struct TemplateCell {
    pub day: DayIndex,
    pub period: Period,
    pub subject: &'static str,
    pub teacher: &'static str,
    pub room: &'static str,
    pub memo: &'static str,
    pub color: &'static str,
}

impl TemplateCell {
    const fn new(
        day: DayIndex,
        period: Period,
        subject: &'static str,
        room: &'static str,
        memo: &'static str,
        color: &'static str,
    ) -> Self {
        Self {
            day,
            period,
            subject,
            teacher: "",
            room,
            memo,
            color,
        }
    }

    fn to_cell(self) -> Cell {
        Cell::new(self.subject, self.teacher, self.room, self.memo, self.color)
    }
}

// --- 2. テンプレートに最初から入っている結合 ---
#[derive(Debug, Clone, Copy)]
pub struct TemplateMerge {
    pub day: DayIndex,
    pub start: Period,
    pub span: u8,
}

// --- 3. Template 本体 ---
#[derive(Debug)]
pub struct Template {
    pub id: &'static str,
    pub name: &'static str,
    pub days: &'static [DayIndex],
    pub period_count: u8,
    /// 1限〜8限の既定時刻。時限数が少なくても8つすべて持つ
    pub times: [(&'static str, &'static str); MAX_PERIODS],
    pub cells: &'static [TemplateCell],
    pub merges: &'static [TemplateMerge],
}

static TEMPLATES: [Template; 5] = [
    Template {
        id: "university",
        name: "大学 (90分授業)",
        days: &[0, 1, 2, 3, 4],
        period_count: 5,
        times: [
            ("09:00", "10:30"),
            ("10:40", "12:10"),
            ("13:00", "14:30"),
            ("14:40", "16:10"),
            ("16:20", "17:50"),
            ("18:00", "19:30"),
            ("19:40", "21:10"),
            ("21:20", "22:50"),
        ],
        cells: &[],
        merges: &[],
    },
    Template {
        id: "high_school",
        name: "高校 (50分授業)",
        days: &[0, 1, 2, 3, 4],
        period_count: 6,
        times: [
            ("08:50", "09:40"),
            ("09:50", "10:40"),
            ("10:50", "11:40"),
            ("11:50", "12:40"),
            ("13:30", "14:20"),
            ("14:30", "15:20"),
            ("15:30", "16:20"),
            ("16:30", "17:20"),
        ],
        cells: &[
            TemplateCell::new(0, 1, "朝礼", "体育館", "", "#F59E0B"),
            TemplateCell::new(4, 6, "ロングホームルーム", "教室", "", "#F59E0B"),
        ],
        merges: &[],
    },
    Template {
        id: "junior_high",
        name: "中学 (土曜授業あり)",
        days: &[0, 1, 2, 3, 4, 5],
        period_count: 6,
        times: [
            ("08:45", "09:35"),
            ("09:45", "10:35"),
            ("10:45", "11:35"),
            ("11:45", "12:35"),
            ("13:25", "14:15"),
            ("14:25", "15:15"),
            ("15:25", "16:15"),
            ("16:25", "17:15"),
        ],
        cells: &[TemplateCell::new(2, 5, "総合学習", "", "", "#10B981")],
        merges: &[TemplateMerge { day: 2, start: 5, span: 2 }],
    },
    Template {
        id: "cram_school",
        name: "塾・習い事 (夕方)",
        days: &[0, 1, 2, 3, 4, 5],
        period_count: 4,
        times: [
            ("16:00", "16:50"),
            ("17:00", "17:50"),
            ("18:00", "18:50"),
            ("19:00", "19:50"),
            ("20:00", "20:50"),
            ("21:00", "21:50"),
            ("22:00", "22:50"),
            ("23:00", "23:50"),
        ],
        cells: &[TemplateCell::new(5, 1, "模試", "", "月1回", "#EF4444")],
        merges: &[TemplateMerge { day: 5, start: 1, span: 2 }],
    },
    Template {
        id: "blank",
        name: "白紙 (毎日8コマ)",
        days: &[0, 1, 2, 3, 4, 5, 6],
        period_count: 8,
        times: BUILTIN_PERIOD_TIMES,
        cells: &[],
        merges: &[],
    },
];

pub fn list_templates() -> &'static [Template] {
    &TEMPLATES
}

pub fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn default_template() -> &'static Template {
    // TEMPLATES の先頭が DEFAULT_TEMPLATE_ID
    &TEMPLATES[0]
}

/// 未知のIDは既定テンプレートとして扱う
pub fn get_template_by_id(id: &str) -> &'static Template {
    find_template(id).unwrap_or_else(default_template)
}

impl Template {
    pub fn period_times(&self) -> [TimeRange; MAX_PERIODS] {
        self.times.map(|(start, end)| TimeRange::new(start, end))
    }

    pub fn has_prefilled_cells(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn has_merges(&self) -> bool {
        !self.merges.is_empty()
    }

    /// テンプレートの既定ドキュメントを作る
    /// 結合ブロックの中のコマには開始コマの内容を写しておく
    pub fn default_document(&self) -> Document {
        let mut cells: Grid<Cell> = empty_grid();
        for template_cell in self.cells {
            if let Some((d, p)) = slot_index(template_cell.day, template_cell.period) {
                cells[d][p] = template_cell.to_cell();
            }
        }

        let mut merges: Grid<Option<u8>> = empty_grid();
        for merge in self.merges {
            if let Some((d, p)) = slot_index(merge.day, merge.start) {
                merges[d][p] = Some(merge.span);
                let end = (p + merge.span as usize).min(MAX_PERIODS);
                for covered in p + 1..end {
                    cells[d][covered] = cells[d][p].clone();
                }
            }
        }

        let document = Document {
            meta: Meta {
                title: DEFAULT_TITLE.to_string(),
                active_days: self.days.to_vec(),
                period_count: self.period_count,
                template_id: self.id.to_string(),
                share_filters: false,
            },
            period_times: self.period_times(),
            day_overrides: empty_grid(),
            cells,
            merges,
            filters: Default::default(),
            ui: UiState {
                selected_day: self.days.first().copied().unwrap_or_default(),
                ..Default::default()
            },
        };

        sanitize(document)
    }
}
