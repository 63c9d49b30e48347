use crate::confidence::format_percent_precise;
use crate::error::ValidationError;
use crate::models::{CandidateId, MatchResult};
use crate::urls::encode_form;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Average confidence (in percent) at or above which a page reads as Pass.
pub const PAGE_PASS_PERCENT: f64 = 80.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchFilter {
    pub candidate_id: Option<CandidateId>,
    /// `YYYY-MM-DD`, passed through as typed.
    pub start_date: String,
    pub end_date: String,
    /// Raw text of the number input; blank means no threshold.
    pub min_confidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl Page {
    pub fn previous(self) -> Self {
        Self {
            offset: self.offset.saturating_sub(self.limit),
            ..self
        }
    }

    pub fn next(self) -> Self {
        Self {
            offset: self.offset.saturating_add(self.limit),
            ..self
        }
    }

    pub fn is_first(&self) -> bool {
        self.offset == 0
    }
}

/// Builds the query string for the global match-history endpoint. Empty
/// filters are left out entirely.
pub fn match_query(filter: &MatchFilter, page: Page) -> Result<String, ValidationError> {
    let mut pairs: Vec<(&str, String)> = vec![
        ("limit", page.limit.to_string()),
        ("offset", page.offset.to_string()),
    ];
    if let Some(id) = filter.candidate_id {
        pairs.push(("candidate_id", id.to_string()));
    }
    let start = filter.start_date.trim();
    if !start.is_empty() {
        pairs.push(("start_date", start.to_string()));
    }
    let end = filter.end_date.trim();
    if !end.is_empty() {
        pairs.push(("end_date", end.to_string()));
    }
    let min = filter.min_confidence.trim();
    if !min.is_empty() {
        let value: f64 = min
            .parse()
            .map_err(|_| ValidationError::InvalidConfidenceFilter)?;
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::InvalidConfidenceFilter);
        }
        pairs.push(("min_confidence", min.to_string()));
    }
    Ok(encode_form(&pairs))
}

/// Current page of the analytics view. A move only takes effect once the
/// query for the target page builds, so a rejected filter leaves the pager
/// where it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pager {
    page: Page,
}

impl Pager {
    pub fn page(&self) -> Page {
        self.page
    }

    fn go(&mut self, filter: &MatchFilter, target: Page) -> Result<String, ValidationError> {
        let query = match_query(filter, target)?;
        self.page = target;
        Ok(query)
    }

    /// Query for the current page with the current filter.
    pub fn reload(&mut self, filter: &MatchFilter) -> Result<String, ValidationError> {
        self.go(filter, self.page)
    }

    /// Applying filters starts over at the first page.
    pub fn first(&mut self, filter: &MatchFilter) -> Result<String, ValidationError> {
        self.go(filter, Page::default())
    }

    pub fn next(&mut self, filter: &MatchFilter) -> Result<String, ValidationError> {
        self.go(filter, self.page.next())
    }

    pub fn previous(&mut self, filter: &MatchFilter) -> Result<String, ValidationError> {
        self.go(filter, self.page.previous())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSummary {
    pub count: usize,
    pub average_percent: f64,
}

impl PageSummary {
    pub fn passed(&self) -> bool {
        self.average_percent >= PAGE_PASS_PERCENT
    }

    pub fn average_display(&self) -> String {
        format!("{:.2}%", self.average_percent)
    }
}

/// Mean confidence across the loaded page only, never the full history.
pub fn summarize(records: &[MatchResult]) -> PageSummary {
    let count = records.len();
    let average_percent = if count == 0 {
        0.0
    } else {
        records
            .iter()
            .map(|m| m.confidence_score * 100.0)
            .sum::<f64>()
            / count as f64
    };
    PageSummary {
        count,
        average_percent,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidencePoint {
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramesPoint {
    pub label: String,
    pub matching: u32,
    pub checked: u32,
}

fn point_label(record: &MatchResult) -> String {
    format!("#{}", record.id)
}

pub fn confidence_series(records: &[MatchResult]) -> Vec<ConfidencePoint> {
    records
        .iter()
        .map(|m| ConfidencePoint {
            label: point_label(m),
            percent: format_percent_precise(m.confidence_score)
                .parse()
                .unwrap_or(0.0),
        })
        .collect()
}

pub fn frames_series(records: &[MatchResult]) -> Vec<FramesPoint> {
    records
        .iter()
        .map(|m| FramesPoint {
            label: point_label(m),
            matching: m.matching_frames,
            checked: m.checked_frames,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, score: f64) -> MatchResult {
        MatchResult {
            id,
            confidence_score: score,
            matching_frames: 8,
            checked_frames: 10,
            ..Default::default()
        }
    }

    #[test]
    fn query_leaves_out_blank_filters() {
        let q = match_query(&MatchFilter::default(), Page::default()).unwrap();
        assert_eq!(q, "limit=50&offset=0");
    }

    #[test]
    fn query_includes_all_filters_in_order() {
        let filter = MatchFilter {
            candidate_id: Some(CandidateId(9)),
            start_date: "2025-01-01".into(),
            end_date: "2025-02-01".into(),
            min_confidence: "0.75".into(),
        };
        let q = match_query(&filter, Page { limit: 20, offset: 40 }).unwrap();
        assert_eq!(
            q,
            "limit=20&offset=40&candidate_id=9&start_date=2025-01-01&end_date=2025-02-01&min_confidence=0.75"
        );
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let filter = MatchFilter {
            min_confidence: "1.5".into(),
            ..Default::default()
        };
        assert_eq!(
            match_query(&filter, Page::default()),
            Err(ValidationError::InvalidConfidenceFilter)
        );
    }

    #[test]
    fn previous_clamps_at_zero() {
        let page = Page { limit: 50, offset: 30 };
        assert_eq!(page.previous().offset, 0);
        assert_eq!(page.next().offset, 80);
        assert!(Page::default().is_first());
    }

    #[test]
    fn rejected_filter_does_not_move_the_pager() {
        let mut pager = Pager::default();
        let mut filter = MatchFilter::default();
        pager.next(&filter).unwrap();
        assert_eq!(pager.page().offset, 50);

        filter.min_confidence = "2".into();
        assert_eq!(pager.next(&filter), Err(ValidationError::InvalidConfidenceFilter));
        assert_eq!(pager.previous(&filter), Err(ValidationError::InvalidConfidenceFilter));
        assert_eq!(pager.first(&filter), Err(ValidationError::InvalidConfidenceFilter));
        assert_eq!(pager.page().offset, 50);

        filter.min_confidence = "0.5".into();
        let query = pager.next(&filter).unwrap();
        assert!(query.contains("offset=100"));
        assert_eq!(pager.page().offset, 100);
        assert!(pager.first(&filter).unwrap().contains("offset=0"));
        assert!(pager.page().is_first());
    }

    #[test]
    fn average_covers_loaded_page_only() {
        let summary = summarize(&[record(1, 0.9), record(2, 0.6)]);
        assert_eq!(summary.count, 2);
        assert!((summary.average_percent - 75.0).abs() < 1e-9);
        assert!(!summary.passed());
        assert_eq!(summary.average_display(), "75.00%");
    }

    #[test]
    fn empty_page_averages_to_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary.average_percent, 0.0);
        assert!(!summary.passed());
    }

    #[test]
    fn series_use_hash_labels() {
        let records = [record(4, 0.8765)];
        assert_eq!(
            confidence_series(&records),
            vec![ConfidencePoint { label: "#4".into(), percent: 87.65 }]
        );
        assert_eq!(
            frames_series(&records),
            vec![FramesPoint { label: "#4".into(), matching: 8, checked: 10 }]
        );
    }
}
