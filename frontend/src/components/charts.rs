use shared::analytics::{ConfidencePoint, FramesPoint, PAGE_PASS_PERCENT};
use yew::prelude::*;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 200.0;
const PAD: f64 = 24.0;

/// SVG `points` attribute for percentages on a 0..100 vertical axis.
fn polyline_points(points: &[ConfidencePoint]) -> String {
    let plot_w = WIDTH - 2.0 * PAD;
    let plot_h = HEIGHT - 2.0 * PAD;
    let step = if points.len() > 1 {
        plot_w / (points.len() - 1) as f64
    } else {
        0.0
    };

    points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let x = PAD + step * i as f64;
            let y = PAD + plot_h * (1.0 - p.percent.clamp(0.0, 100.0) / 100.0);
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bar_width(value: u32, max: u32) -> f64 {
    if max == 0 {
        0.0
    } else {
        f64::from(value) / f64::from(max) * 100.0
    }
}

#[derive(Properties, PartialEq)]
pub struct ConfidenceTrendProps {
    pub points: Vec<ConfidencePoint>,
}

#[function_component(ConfidenceTrend)]
pub fn confidence_trend(props: &ConfidenceTrendProps) -> Html {
    if props.points.is_empty() {
        return html! {};
    }
    let pass_y = PAD + (HEIGHT - 2.0 * PAD) * (1.0 - PAGE_PASS_PERCENT / 100.0);

    html! {
        <div class="chart confidence-trend">
            <h3>{"Confidence Trend"}</h3>
            <svg viewBox={format!("0 0 {} {}", WIDTH, HEIGHT)} preserveAspectRatio="none">
                <line class="pass-line" x1={PAD.to_string()} x2={(WIDTH - PAD).to_string()}
                    y1={pass_y.to_string()} y2={pass_y.to_string()} />
                <polyline class="trend-line" fill="none" points={polyline_points(&props.points)} />
            </svg>
            <div class="chart-labels">
                { for props.points.iter().map(|p| html! {
                    <span class="chart-label" title={format!("{:.2}%", p.percent)}>{ &p.label }</span>
                }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FramesComparisonProps {
    pub points: Vec<FramesPoint>,
}

/// Matching against checked frames per record, as paired bars.
#[function_component(FramesComparison)]
pub fn frames_comparison(props: &FramesComparisonProps) -> Html {
    if props.points.is_empty() {
        return html! {};
    }
    let max = props.points.iter().map(|p| p.checked.max(p.matching)).max().unwrap_or(0);

    html! {
        <div class="chart frames-comparison">
            <h3>{"Matching vs Checked Frames"}</h3>
            { for props.points.iter().map(|p| html! {
                <div class="result-item">
                    <div class="result-label">{ &p.label }</div>
                    <div class="result-bar-container">
                        <div class="result-bar checked" style={format!("width: {:.1}%", bar_width(p.checked, max))}></div>
                    </div>
                    <div class="result-bar-container">
                        <div class="result-bar matching" style={format!("width: {:.1}%", bar_width(p.matching, max))}></div>
                    </div>
                    <div class="result-value">{ format!("{} / {}", p.matching, p.checked) }</div>
                </div>
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(percent: f64) -> ConfidencePoint {
        ConfidencePoint {
            label: "#1".into(),
            percent,
        }
    }

    #[test]
    fn polyline_spans_plot_area() {
        let points = polyline_points(&[point(100.0), point(0.0)]);
        assert_eq!(points, "24.0,24.0 576.0,176.0");
    }

    #[test]
    fn single_point_sits_on_left_edge() {
        assert_eq!(polyline_points(&[point(50.0)]), "24.0,100.0");
    }

    #[test]
    fn bars_scale_to_largest_count() {
        assert_eq!(bar_width(10, 20), 50.0);
        assert_eq!(bar_width(3, 0), 0.0);
    }
}
