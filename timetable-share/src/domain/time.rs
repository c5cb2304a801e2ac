use chrono::NaiveTime;

use crate::domain::models::{TimeRange, MAX_PERIODS};

/// テンプレートの時刻すら使えないときの組み込み既定時刻 (1限〜8限)
pub const BUILTIN_PERIOD_TIMES: [(&str, &str); MAX_PERIODS] = [
    ("09:00", "09:50"),
    ("10:00", "10:50"),
    ("11:00", "11:50"),
    ("13:00", "13:50"),
    ("14:00", "14:50"),
    ("15:00", "15:50"),
    ("16:00", "16:50"),
    ("17:00", "17:50"),
];

/// "HH:MM" を厳密に解釈する
///
/// chrono は "9:05" のような一桁の時も受け付けるので、
/// 先に桁数とコロンの位置を確認してから渡す。
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    if ![0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit()) {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

impl TimeRange {
    /// 両端が正しい書式で、かつ start < end
    pub fn is_valid(&self) -> bool {
        match (parse_hhmm(&self.start), parse_hhmm(&self.end)) {
            (Some(start), Some(end)) => start < end,
            _ => false,
        }
    }

    pub fn duration_minutes(&self) -> Option<i64> {
        let start = parse_hhmm(&self.start)?;
        let end = parse_hhmm(&self.end)?;
        (start < end).then(|| (end - start).num_minutes())
    }
}

pub fn builtin_period_time(index: usize) -> TimeRange {
    let (start, end) = BUILTIN_PERIOD_TIMES[index.min(MAX_PERIODS - 1)];
    TimeRange::new(start, end)
}
