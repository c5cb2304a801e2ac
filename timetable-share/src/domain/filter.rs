use crate::domain::models::{Cell, DayIndex, Document, Filters, Period};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
            && self.subject.is_empty()
            && self.teacher.is_empty()
            && self.room.is_empty()
            && self.color.is_empty()
    }

    /// すべての条件を満たすか。空の条件は無視する
    pub fn matches(&self, cell: &Cell) -> bool {
        let query = self.query.trim();
        let query_hit = query.is_empty()
            || [&cell.subject, &cell.teacher, &cell.room, &cell.memo]
                .iter()
                .any(|field| contains_ignore_case(field, query));

        query_hit
            && (self.subject.is_empty() || contains_ignore_case(&cell.subject, &self.subject))
            && (self.teacher.is_empty() || contains_ignore_case(&cell.teacher, &self.teacher))
            && (self.room.is_empty() || contains_ignore_case(&cell.room, &self.room))
            && (self.color.is_empty() || cell.color.eq_ignore_ascii_case(&self.color))
    }
}

impl Document {
    /// 表示中の曜日・時限のうち、検索条件に合うコマの一覧
    /// 条件が空なら内容のあるコマすべて
    pub fn matching_slots(&self) -> Vec<(DayIndex, Period)> {
        let count = self.meta.period_count;
        self.meta
            .active_days
            .iter()
            .flat_map(|&day| (1..=count).map(move |period| (day, period)))
            .filter(|&(day, period)| {
                self.cell(day, period)
                    .is_some_and(|cell| cell.has_content() && self.filters.matches(cell))
            })
            .collect()
    }
}
