//! Configuration for visualization functionality

/// Chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Vertical bar chart
    Bar,
    /// Horizontal bar chart
    HorizontalBar,
    /// Scatter plot
    Scatter,
    /// Line graph
    Line,
    /// Annotated heatmap
    Heatmap,
}

/// Plot output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// PNG image
    Png,
    /// SVG document
    Svg,
}

impl OutputType {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputType::Png => "png",
            OutputType::Svg => "svg",
        }
    }
}

/// Plot settings
#[derive(Debug, Clone)]
pub struct PlotSettings {
    /// Title
    pub title: String,
    /// X-axis label
    pub x_label: String,
    /// Y-axis label
    pub y_label: String,
    /// Width of the chart (pixels)
    pub width: u32,
    /// Height of the chart (pixels)
    pub height: u32,
    /// Output format
    pub output_type: OutputType,
    /// Show legend
    pub show_legend: bool,
    /// Show grid
    pub show_grid: bool,
    /// Color palette
    pub color_palette: Vec<(u8, u8, u8)>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            title: "Plot".to_string(),
            x_label: "X".to_string(),
            y_label: "Y".to_string(),
            width: 1000,
            height: 700,
            output_type: OutputType::Png,
            show_legend: true,
            show_grid: true,
            color_palette: vec![
                (0, 123, 255),   // Blue
                (255, 99, 71),   // Red
                (46, 204, 113),  // Green
                (255, 193, 7),   // Yellow
                (142, 68, 173),  // Purple
                (52, 152, 219),  // Cyan
                (243, 156, 18),  // Orange
                (211, 84, 0),    // Brown
                (26, 188, 156),  // Teal
                (127, 140, 141), // Grey
            ],
        }
    }
}

impl PlotSettings {
    /// Titled settings with axis labels
    pub fn titled(title: &str, x_label: &str, y_label: &str) -> Self {
        PlotSettings {
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            ..Default::default()
        }
    }

    /// Palette color for a series index, rotating when the palette is
    /// exhausted.
    pub fn color_at(&self, idx: usize) -> (u8, u8, u8) {
        self.color_palette[idx % self.color_palette.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_rotation() {
        let settings = PlotSettings::default();
        let n = settings.color_palette.len();
        assert_eq!(settings.color_at(0), settings.color_at(n));
    }

    #[test]
    fn test_extension() {
        assert_eq!(OutputType::Png.extension(), "png");
        assert_eq!(OutputType::Svg.extension(), "svg");
    }
}
