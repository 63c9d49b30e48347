use strum_macros::Display;

pub const PASS_THRESHOLD: f64 = 0.80;
pub const REVIEW_THRESHOLD: f64 = 0.50;

/// Three-band reading of a face-match confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfidenceTier {
    Pass,
    Review,
    Fail,
}

impl ConfidenceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= PASS_THRESHOLD {
            ConfidenceTier::Pass
        } else if score >= REVIEW_THRESHOLD {
            ConfidenceTier::Review
        } else {
            ConfidenceTier::Fail
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ConfidenceTier::Pass => "tier-pass",
            ConfidenceTier::Review => "tier-review",
            ConfidenceTier::Fail => "tier-fail",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ConfidenceTier::Pass => "#22c55e",
            ConfidenceTier::Review => "#f59e0b",
            ConfidenceTier::Fail => "#ef4444",
        }
    }
}

/// Whole-number percentage, e.g. `0.83` -> `"83%"`.
pub fn format_percent(score: f64) -> String {
    format!("{:.0}%", (score * 100.0).round())
}

/// Two-decimal percentage without the sign, as used in tables and CSV.
pub fn format_percent_precise(score: f64) -> String {
    format!("{:.2}", score * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_is_pass_and_prints_whole_percent() {
        let tier = ConfidenceTier::from_score(0.83);
        assert_eq!(tier, ConfidenceTier::Pass);
        assert_eq!(tier.css_class(), "tier-pass");
        assert_eq!(format_percent(0.83), "83%");
    }

    #[test]
    fn band_edges() {
        assert_eq!(ConfidenceTier::from_score(0.80), ConfidenceTier::Pass);
        assert_eq!(ConfidenceTier::from_score(0.7999), ConfidenceTier::Review);
        assert_eq!(ConfidenceTier::from_score(0.62), ConfidenceTier::Review);
        assert_eq!(ConfidenceTier::from_score(0.50), ConfidenceTier::Review);
        assert_eq!(ConfidenceTier::from_score(0.42), ConfidenceTier::Fail);
        assert_eq!(ConfidenceTier::from_score(0.0), ConfidenceTier::Fail);
    }

    #[test]
    fn precise_percent_has_two_decimals() {
        assert_eq!(format_percent_precise(0.9123), "91.23");
        assert_eq!(format_percent_precise(0.5), "50.00");
    }
}
