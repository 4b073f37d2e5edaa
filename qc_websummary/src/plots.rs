use crate::{ChartWithHelp, PlotlyChart, TitleWithHelp};
use plotly::common::{Anchor, Line, Marker, MarkerSymbol, Mode};
use plotly::layout::{Axis, HoverMode, Legend, Margin};
use plotly::{HeatMap, Layout, Scatter};

pub fn standard_layout(x_label: &str, y_label: &str) -> Layout {
    Layout::new()
        .margin(Margin::new().left(70).right(65).top(30).bottom(70))
        .show_legend(true)
        .hover_mode(HoverMode::Closest)
        .x_axis(Axis::new().title(x_label))
        .y_axis(Axis::new().title(y_label))
        .legend(
            Legend::new()
                .y_anchor(Anchor::Bottom)
                .y(0.1)
                .x_anchor(Anchor::Right)
                .x(0.99)
                .background_color("#ffffff"),
        )
}

/// One coloured series of a scatter plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub name: String,
    pub color: &'static str,
    /// Draw the points larger and as diamonds, for the data being assessed.
    pub highlight: bool,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Hover label of every point.
    pub labels: Vec<String>,
}

/// Scatter plot with one trace per group, in the order given.
pub fn scatter_chart(
    title: &str,
    help: &str,
    x_label: &str,
    y_label: &str,
    groups: Vec<ScatterGroup>,
) -> ChartWithHelp {
    let data: Vec<_> = groups
        .into_iter()
        .map(|g| {
            let (symbol, size) = if g.highlight {
                (MarkerSymbol::Diamond, 12)
            } else {
                (MarkerSymbol::Circle, 9)
            };
            *Scatter::new(g.x, g.y)
                .name(&g.name)
                .mode(Mode::Markers)
                .text_array(g.labels)
                .marker(
                    Marker::new()
                        .color(g.color)
                        .size(size)
                        .symbol(symbol)
                        .line(Line::new().color("white").width(0.5)),
                )
        })
        .collect();

    ChartWithHelp {
        plot: PlotlyChart::with_layout_and_data(standard_layout(x_label, y_label), data),
        help: TitleWithHelp {
            title: title.to_string(),
            help: help.to_string(),
        },
    }
}

/// Heat map of `z[row][column]`, rows labelled by `y`, columns by `x`.
pub fn heatmap_chart(
    title: &str,
    help: &str,
    x_label: &str,
    y_label: &str,
    x: Vec<String>,
    y: Vec<String>,
    z: Vec<Vec<f64>>,
) -> ChartWithHelp {
    let layout = standard_layout(x_label, y_label)
        .show_legend(false)
        .margin(Margin::new().left(260).right(65).top(30).bottom(120));
    let data = vec![*HeatMap::new(x, y, z)];
    ChartWithHelp {
        plot: PlotlyChart::with_layout_and_data(layout, data),
        help: TitleWithHelp {
            title: title.to_string(),
            help: help.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scatter_chart() {
        let chart = scatter_chart(
            "SNV Performance",
            "",
            "F1-score",
            "Mendelian Concordance Rate",
            vec![
                ScatterGroup {
                    name: "Historical Datasets".to_string(),
                    color: "#007dd4",
                    highlight: false,
                    x: vec![0.95, 0.97],
                    y: vec![0.96, 0.98],
                    labels: vec!["A".to_string(), "B".to_string()],
                },
                ScatterGroup {
                    name: "Your Datasets".to_string(),
                    color: "#ed6f00",
                    highlight: true,
                    x: vec![f64::NAN],
                    y: vec![0.97],
                    labels: vec!["LCL5".to_string()],
                },
            ],
        );
        assert_eq!(chart.help.title, "SNV Performance");
        let data = &chart.plot.data;
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["name"], "Historical Datasets");
        assert_eq!(data[0]["mode"], "markers");
        assert_eq!(data[1]["marker"]["color"], "#ed6f00");
        assert!(data[1]["x"][0].is_null());
        assert_eq!(chart.plot.layout["xaxis"]["title"]["text"], "F1-score");
        assert_eq!(chart.plot.config["displayModeBar"], true);
    }

    #[test]
    fn test_heatmap_chart() {
        let chart = heatmap_chart(
            "Historical scores",
            "",
            "batch",
            "metric",
            vec!["b1".to_string(), "b2".to_string()],
            vec!["Total Score".to_string()],
            vec![vec![0.9, 0.95]],
        );
        assert_eq!(chart.plot.data[0]["type"], "heatmap");
        assert_eq!(chart.plot.data[0]["z"][0][1], 0.95);
    }
}
