//! The grid strategy: typed row/column tracks with cell spans.

use crate::geom::{Rect, Size};
use crate::layout::{Children, LayoutHost};

/// How one grid track is sized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridLength {
    /// A fixed extent in layout units.
    Fixed(f64),
    /// Sized to the largest child spanning the track.
    Auto,
    /// A weighted share of whatever the fixed and auto tracks leave over.
    Fill(f64),
}

/// Sizing priority: fixed tracks first, auto next, fill last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Kind {
    /// All spanned tracks are fixed.
    Fixed,
    /// At least one auto track, no fill.
    Auto,
    /// At least one fill track.
    Fill,
}

impl GridLength {
    /// The track's sizing priority.
    fn kind(self) -> Kind {
        match self {
            Self::Fixed(_) => Kind::Fixed,
            Self::Auto => Kind::Auto,
            Self::Fill(_) => Kind::Fill,
        }
    }
}

/// A child's cell assignment, packed into its layout tag.
///
/// Spans of zero read back as one; positions and spans outside the grid are
/// clipped to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTag {
    /// Row index of the top-left cell.
    pub row: u16,
    /// Column index of the top-left cell.
    pub col: u16,
    /// Number of rows covered.
    pub row_span: u16,
    /// Number of columns covered.
    pub col_span: u16,
}

impl GridTag {
    /// A single-cell assignment.
    pub fn new(row: u16, col: u16) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
        }
    }

    /// Extend the assignment over multiple cells.
    pub fn span(mut self, rows: u16, cols: u16) -> Self {
        self.row_span = rows;
        self.col_span = cols;
        self
    }

    /// Pack into a layout tag.
    pub fn pack(self) -> u64 {
        u64::from(self.row)
            | u64::from(self.col) << 16
            | u64::from(self.row_span) << 32
            | u64::from(self.col_span) << 48
    }

    /// Unpack from a layout tag.
    pub fn unpack(tag: u64) -> Self {
        Self {
            row: tag as u16,
            col: (tag >> 16) as u16,
            row_span: ((tag >> 32) as u16).max(1),
            col_span: ((tag >> 48) as u16).max(1),
        }
    }

    /// The spanned index range along one axis, clipped to `len` tracks.
    fn range(start: u16, span: u16, len: usize) -> (usize, usize) {
        let start = (start as usize).min(len - 1);
        let end = (start + span as usize).min(len);
        (start, end)
    }
}

/// Lays children out in typed rows and columns.
///
/// Track sizing runs fixed, then auto, then fill: auto tracks grow to their
/// content (span shortfalls split equally over the spanned auto tracks),
/// and fill tracks split the remaining space by weight. An empty track list
/// acts as a single weight-one fill track.
pub struct GridLayout {
    /// Row definitions as supplied.
    rows: Vec<GridLength>,
    /// Column definitions as supplied.
    cols: Vec<GridLength>,
    /// Column sizes computed by the last measure.
    col_sizes: Vec<f64>,
    /// Row sizes computed by the last measure.
    row_sizes: Vec<f64>,
}

impl GridLayout {
    /// A grid with the given track definitions.
    pub fn new(rows: Vec<GridLength>, cols: Vec<GridLength>) -> Self {
        Self {
            rows,
            cols,
            col_sizes: Vec::new(),
            row_sizes: Vec::new(),
        }
    }

    /// Effective row tracks: empty means one fill track.
    fn eff_rows(&self) -> Vec<GridLength> {
        if self.rows.is_empty() {
            vec![GridLength::Fill(1.0)]
        } else {
            self.rows.clone()
        }
    }

    /// Effective column tracks: empty means one fill track.
    fn eff_cols(&self) -> Vec<GridLength> {
        if self.cols.is_empty() {
            vec![GridLength::Fill(1.0)]
        } else {
            self.cols.clone()
        }
    }
}

/// The strongest track kind within a span.
fn span_kind(tracks: &[GridLength], start: usize, end: usize) -> Kind {
    tracks[start..end]
        .iter()
        .map(|t| t.kind())
        .max()
        .unwrap_or(Kind::Fixed)
}

/// Grow spanned tracks to cover `needed`, splitting any shortfall equally
/// over the spanned auto tracks.
fn bump_auto(tracks: &[GridLength], sizes: &mut [f64], start: usize, end: usize, needed: f64) {
    let current: f64 = sizes[start..end].iter().sum();
    let shortfall = needed - current;
    if shortfall <= 0.0 {
        return;
    }
    let autos: Vec<usize> = (start..end)
        .filter(|&i| tracks[i].kind() == Kind::Auto)
        .collect();
    if autos.is_empty() {
        return;
    }
    let each = shortfall / autos.len() as f64;
    for i in autos {
        sizes[i] += each;
    }
}

/// Size the fill tracks from `remaining`, split by weight. A zero weight
/// total splits equally.
fn distribute_fill(tracks: &[GridLength], sizes: &mut [f64], remaining: f64) {
    let fills: Vec<(usize, f64)> = tracks
        .iter()
        .enumerate()
        .filter_map(|(i, t)| match t {
            GridLength::Fill(w) => Some((i, w.max(0.0))),
            _ => None,
        })
        .collect();
    if fills.is_empty() {
        return;
    }
    let total: f64 = fills.iter().map(|(_, w)| w).sum();
    let remaining = remaining.max(0.0);
    for (i, w) in &fills {
        sizes[*i] = if total > 0.0 {
            remaining * w / total
        } else {
            remaining / fills.len() as f64
        };
    }
}

/// Indices ordered by spanned-kind priority, then span length.
fn sizing_order(assignments: &[(usize, usize, Kind)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..assignments.len()).collect();
    order.sort_by_key(|&i| (assignments[i].2, assignments[i].1 - assignments[i].0));
    order
}

impl LayoutHost for GridLayout {
    fn measure(&mut self, children: &mut Children<'_>, available: Size) -> Size {
        let rows = self.eff_rows();
        let cols = self.eff_cols();
        let mut col_sizes: Vec<f64> = cols
            .iter()
            .map(|t| match t {
                GridLength::Fixed(v) => v.max(0.0),
                _ => 0.0,
            })
            .collect();
        let mut row_sizes: Vec<f64> = rows
            .iter()
            .map(|t| match t {
                GridLength::Fixed(v) => v.max(0.0),
                _ => 0.0,
            })
            .collect();

        let tags: Vec<GridTag> = (0..children.len())
            .map(|i| GridTag::unpack(children.tag(i)))
            .collect();
        let col_spans: Vec<(usize, usize, Kind)> = tags
            .iter()
            .map(|t| {
                let (s, e) = GridTag::range(t.col, t.col_span, cols.len());
                (s, e, span_kind(&cols, s, e))
            })
            .collect();
        let row_spans: Vec<(usize, usize, Kind)> = tags
            .iter()
            .map(|t| {
                let (s, e) = GridTag::range(t.row, t.row_span, rows.len());
                (s, e, span_kind(&rows, s, e))
            })
            .collect();

        // Columns: auto tracks grow to unconstrained content; fill tracks
        // come from the remainder (or from content when width is
        // unbounded).
        let mut fill_unit = 0.0_f64;
        for i in sizing_order(&col_spans) {
            let (s, e, kind) = col_spans[i];
            match kind {
                Kind::Fixed => {}
                Kind::Auto => {
                    let d = children.measure(i, Size::unbounded());
                    bump_auto(&cols, &mut col_sizes, s, e, d.width);
                }
                Kind::Fill => {
                    if available.width.is_finite() {
                        continue;
                    }
                    let d = children.measure(i, Size::unbounded());
                    let non_fill: f64 = (s..e)
                        .filter(|&c| cols[c].kind() != Kind::Fill)
                        .map(|c| col_sizes[c])
                        .sum();
                    let weights: f64 = (s..e)
                        .filter_map(|c| match cols[c] {
                            GridLength::Fill(w) => Some(w.max(0.0)),
                            _ => None,
                        })
                        .sum();
                    if weights > 0.0 {
                        fill_unit = fill_unit.max((d.width - non_fill) / weights);
                    }
                }
            }
        }
        if available.width.is_finite() {
            let non_fill: f64 = cols
                .iter()
                .zip(&col_sizes)
                .filter(|(t, _)| t.kind() != Kind::Fill)
                .map(|(_, s)| s)
                .sum();
            distribute_fill(&cols, &mut col_sizes, available.width - non_fill);
        } else {
            for (i, t) in cols.iter().enumerate() {
                if let GridLength::Fill(w) = t {
                    col_sizes[i] = fill_unit * w.max(0.0);
                }
            }
        }

        // Rows: same scheme, measured against the settled column widths.
        let mut fill_unit = 0.0_f64;
        for i in sizing_order(&row_spans) {
            let (s, e, kind) = row_spans[i];
            let (cs, ce, _) = col_spans[i];
            let col_width: f64 = col_sizes[cs..ce].iter().sum();
            match kind {
                Kind::Fixed => {
                    let row_height: f64 = row_sizes[s..e].iter().sum();
                    children.measure(i, Size::new(col_width, row_height));
                }
                Kind::Auto => {
                    let d = children.measure(i, Size::new(col_width, f64::INFINITY));
                    bump_auto(&rows, &mut row_sizes, s, e, d.height);
                }
                Kind::Fill => {
                    let d = children.measure(i, Size::new(col_width, f64::INFINITY));
                    if available.height.is_finite() {
                        continue;
                    }
                    let non_fill: f64 = (s..e)
                        .filter(|&r| rows[r].kind() != Kind::Fill)
                        .map(|r| row_sizes[r])
                        .sum();
                    let weights: f64 = (s..e)
                        .filter_map(|r| match rows[r] {
                            GridLength::Fill(w) => Some(w.max(0.0)),
                            _ => None,
                        })
                        .sum();
                    if weights > 0.0 {
                        fill_unit = fill_unit.max((d.height - non_fill) / weights);
                    }
                }
            }
        }
        if available.height.is_finite() {
            let non_fill: f64 = rows
                .iter()
                .zip(&row_sizes)
                .filter(|(t, _)| t.kind() != Kind::Fill)
                .map(|(_, s)| s)
                .sum();
            distribute_fill(&rows, &mut row_sizes, available.height - non_fill);
        } else {
            for (i, t) in rows.iter().enumerate() {
                if let GridLength::Fill(w) = t {
                    row_sizes[i] = fill_unit * w.max(0.0);
                }
            }
        }

        self.col_sizes = col_sizes;
        self.row_sizes = row_sizes;
        Size::new(
            self.col_sizes.iter().sum(),
            self.row_sizes.iter().sum(),
        )
    }

    fn arrange(&mut self, children: &mut Children<'_>, final_size: Size) {
        let rows = self.eff_rows();
        let cols = self.eff_cols();
        if self.col_sizes.len() != cols.len() || self.row_sizes.len() != rows.len() {
            return;
        }
        // The final size may differ from the measured one: fixed and auto
        // tracks keep their measured sizes, fill tracks restretch.
        let non_fill_w: f64 = cols
            .iter()
            .zip(&self.col_sizes)
            .filter(|(t, _)| t.kind() != Kind::Fill)
            .map(|(_, s)| s)
            .sum();
        distribute_fill(&cols, &mut self.col_sizes, final_size.width - non_fill_w);
        let non_fill_h: f64 = rows
            .iter()
            .zip(&self.row_sizes)
            .filter(|(t, _)| t.kind() != Kind::Fill)
            .map(|(_, s)| s)
            .sum();
        distribute_fill(&rows, &mut self.row_sizes, final_size.height - non_fill_h);

        let mut col_off = vec![0.0_f64; cols.len() + 1];
        for i in 0..cols.len() {
            col_off[i + 1] = col_off[i] + self.col_sizes[i];
        }
        let mut row_off = vec![0.0_f64; rows.len() + 1];
        for i in 0..rows.len() {
            row_off[i + 1] = row_off[i] + self.row_sizes[i];
        }

        for i in 0..children.len() {
            let tag = GridTag::unpack(children.tag(i));
            let (cs, ce) = GridTag::range(tag.col, tag.col_span, cols.len());
            let (rs, re) = GridTag::range(tag.row, tag.row_span, rows.len());
            let slot = Rect::new(
                col_off[cs],
                row_off[rs],
                col_off[ce] - col_off[cs],
                row_off[re] - row_off[rs],
            );
            children.arrange(i, slot);
        }
    }
}
