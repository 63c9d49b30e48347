use crate::confidence::format_percent_precise;
use crate::models::{CandidateId, MatchResult};

pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

/// Column sets of the two analytics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Global view, with a candidate name column.
    AllCandidates,
    /// Single-candidate view.
    SingleCandidate,
}

impl CsvLayout {
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            CsvLayout::AllCandidates => &[
                "Match ID",
                "Candidate",
                "Confidence Score",
                "Matching Frames",
                "Checked Frames",
                "Status",
            ],
            CsvLayout::SingleCandidate => &[
                "Match ID",
                "Confidence Score",
                "Matching Frames",
                "Checked Frames",
                "Status",
            ],
        }
    }

    fn row(&self, record: &MatchResult) -> Vec<String> {
        let mut row = vec![record.id.to_string()];
        if *self == CsvLayout::AllCandidates {
            let name = record
                .candidate
                .as_ref()
                .map(|c| c.full_name())
                .unwrap_or_else(|| " ".to_string());
            row.push(name);
        }
        row.extend([
            format_percent_precise(record.confidence_score),
            record.matching_frames.to_string(),
            record.checked_frames.to_string(),
            record.status.clone(),
        ]);
        row
    }
}

pub fn file_name(candidate: Option<CandidateId>) -> String {
    match candidate {
        Some(id) => format!("candidate_{}_match_history.csv", id),
        None => "candidate_analytics.csv".to_string(),
    }
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// CSV text of the currently loaded page: header plus one row per record,
/// newline separated.
pub fn export_csv(records: &[MatchResult], layout: CsvLayout) -> String {
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(line(layout.header()));
    lines.extend(records.iter().map(|r| line(&layout.row(r))));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandidateSummary;

    fn record(id: u64, first: &str, last: &str, score: f64, status: &str) -> MatchResult {
        MatchResult {
            id,
            confidence_score: score,
            match_found: score >= 0.8,
            matching_frames: 17,
            checked_frames: 20,
            status: status.into(),
            candidate: Some(CandidateSummary {
                first_name: first.into(),
                last_name: last.into(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn two_records_give_header_and_two_rows() {
        let csv = export_csv(
            &[
                record(1, "Ana", "Ruiz", 0.91, "Match Found"),
                record(2, "Bo", "Chen", 0.42, "No Match"),
            ],
            CsvLayout::AllCandidates,
        );
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Match ID,Candidate,Confidence Score,Matching Frames,Checked Frames,Status"
        );
        assert_eq!(lines[1], "1,Ana Ruiz,91.00,17,20,Match Found");
        assert_eq!(lines[2], "2,Bo Chen,42.00,17,20,No Match");
    }

    #[test]
    fn single_candidate_layout_drops_name_column() {
        let csv = export_csv(&[record(5, "Ana", "Ruiz", 0.5, "No Match")], CsvLayout::SingleCandidate);
        assert_eq!(
            csv,
            "Match ID,Confidence Score,Matching Frames,Checked Frames,Status\n5,50.00,17,20,No Match"
        );
    }

    #[test]
    fn commas_and_quotes_are_escaped() {
        let csv = export_csv(
            &[record(3, "Ruiz,", "\"Ana\"", 0.8, "Match Found")],
            CsvLayout::AllCandidates,
        );
        assert!(csv.ends_with("3,\"Ruiz, \"\"Ana\"\"\",80.00,17,20,Match Found"));
    }

    #[test]
    fn empty_page_is_header_only() {
        assert_eq!(export_csv(&[], CsvLayout::SingleCandidate).lines().count(), 1);
    }

    #[test]
    fn file_names() {
        assert_eq!(file_name(None), "candidate_analytics.csv");
        assert_eq!(file_name(Some(CandidateId(7))), "candidate_7_match_history.csv");
    }
}
