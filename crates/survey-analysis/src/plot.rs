//! Chart descriptions handed to the renderer.

/// One named series of bar values, aligned with the request's categories.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub values: Vec<f64>,
}

/// A chart the caller should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    /// Grouped horizontal bars: one bar per category and series.
    HorizontalBars {
        title: String,
        value_label: String,
        categories: Vec<String>,
        series: Vec<PlotSeries>,
    },
    /// Bars stacked to 100%, one segment per series.
    StackedPercentBars {
        title: String,
        horizontal: bool,
        categories: Vec<String>,
        series: Vec<PlotSeries>,
    },
    /// Box plot of each target group's values.
    BoxPlot {
        title: String,
        groups: Vec<(String, Vec<f64>)>,
    },
    /// Counts per distinct value of one column.
    Distribution {
        title: String,
        counts: Vec<(String, usize)>,
    },
}

impl PlotRequest {
    pub fn title(&self) -> &str {
        match self {
            PlotRequest::HorizontalBars { title, .. }
            | PlotRequest::StackedPercentBars { title, .. }
            | PlotRequest::BoxPlot { title, .. }
            | PlotRequest::Distribution { title, .. } => title,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            PlotRequest::HorizontalBars { .. } => "horizontal bars",
            PlotRequest::StackedPercentBars { .. } => "stacked percentage bars",
            PlotRequest::BoxPlot { .. } => "box plot",
            PlotRequest::Distribution { .. } => "distribution",
        }
    }
}
