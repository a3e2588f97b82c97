use super::model::Record;

// ---------------------------------------------------------------------------
// Filter state: selected year + chart kind
// ---------------------------------------------------------------------------

/// Year selection: everything, or one specific calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    All,
    Year(i32),
}

impl YearFilter {
    /// Label shown in the year selector.
    pub fn label(&self) -> String {
        match self {
            YearFilter::All => "All years".to_string(),
            YearFilter::Year(y) => y.to_string(),
        }
    }
}

/// Which chart the central panel draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar chart",
            ChartKind::Line => "Line chart",
            ChartKind::Pie => "Pie chart",
        }
    }
}

/// The two fields driving every render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    pub year: YearFilter,
    pub chart: ChartKind,
}

impl Default for FilterState {
    fn default() -> Self {
        FilterState {
            year: YearFilter::All,
            chart: ChartKind::Bar,
        }
    }
}

/// Indices of records passing the year filter, in input order.
/// `All` returns every index; a specific year returns exactly the records
/// whose derived year matches.
pub fn filtered_indices(records: &[Record], year: YearFilter) -> Vec<usize> {
    match year {
        YearFilter::All => (0..records.len()).collect(),
        YearFilter::Year(y) => records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.year == y)
            .map(|(i, _)| i)
            .collect(),
    }
}
