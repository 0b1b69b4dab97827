//! Query engine: free-text filter plus pagination over a [`Snapshot`].
//!
//! A record matches when any searchable column contains the needle after
//! Unicode lowercasing. Matching is a single linear pass; pagination slices
//! the filtered index list.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::QueryError;
use crate::types::{ColumnKind, RecordView, Snapshot};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PER_PAGE: usize = 20;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Validated per-request query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    text: String,
    page: usize,
    per_page: usize,
}

impl QueryParams {
    /// Build params from already-typed values. `page` and `per_page` must be
    /// positive.
    pub fn new(text: &str, page: usize, per_page: usize) -> Result<Self, QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidParameter {
                name: "page",
                value: page.to_string(),
            });
        }
        if per_page == 0 {
            return Err(QueryError::InvalidParameter {
                name: "per_page",
                value: per_page.to_string(),
            });
        }
        Ok(Self {
            text: text.trim().to_lowercase(),
            page,
            per_page,
        })
    }

    /// Parse raw request strings. Missing values take the defaults; anything
    /// that is not a positive integer is rejected.
    pub fn parse(
        text: Option<&str>,
        page: Option<&str>,
        per_page: Option<&str>,
        default_per_page: usize,
    ) -> Result<Self, QueryError> {
        let page = parse_positive("page", page, DEFAULT_PAGE)?;
        let per_page = parse_positive("per_page", per_page, default_per_page)?;
        Self::new(text.unwrap_or_default(), page, per_page)
    }

    /// The trimmed, lowercased needle.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }
}

fn parse_positive(name: &'static str, raw: Option<&str>, default: usize) -> Result<usize, QueryError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(QueryError::InvalidParameter {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Engine knobs that come from configuration rather than the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub skip_numeric_columns: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            skip_numeric_columns: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Result of comparing one cell against the needle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellMatch {
    Hit,
    Miss,
    /// The column does not take part in matching; counts as no match.
    Skip,
}

/// Compare a single cell. `needle` must already be lowercased.
pub fn match_cell(kind: ColumnKind, value: &str, needle: &str, options: &SearchOptions) -> CellMatch {
    if kind == ColumnKind::Numeric && options.skip_numeric_columns {
        return CellMatch::Skip;
    }
    if value.to_lowercase().contains(needle) {
        CellMatch::Hit
    } else {
        CellMatch::Miss
    }
}

/// Collects per-column skips during a query and reports them once at the end.
#[derive(Debug, Default)]
pub struct MatchDiagnostics {
    skipped: Vec<usize>,
}

impl MatchDiagnostics {
    pub fn record_skip(&mut self, column: usize) {
        if !self.skipped.contains(&column) {
            self.skipped.push(column);
        }
    }

    /// Indices of the columns skipped at least once.
    pub fn skipped(&self) -> &[usize] {
        &self.skipped
    }

    pub fn emit(&self, snapshot: &Snapshot) {
        if self.skipped.is_empty() {
            return;
        }
        let names: Vec<&str> = self
            .skipped
            .iter()
            .filter_map(|&idx| snapshot.columns().get(idx).map(|c| c.name.as_str()))
            .collect();
        tracing::debug!(columns = ?names, "columns skipped during text match");
    }
}

fn row_matches(
    snapshot: &Snapshot,
    row: &[String],
    needle: &str,
    options: &SearchOptions,
    diagnostics: &mut MatchDiagnostics,
) -> bool {
    let mut hit = false;
    for (idx, (column, value)) in snapshot.columns().iter().zip(row).enumerate() {
        match match_cell(column.kind, value, needle, options) {
            CellMatch::Hit => {
                hit = true;
                break;
            }
            CellMatch::Miss => {}
            CellMatch::Skip => diagnostics.record_skip(idx),
        }
    }
    hit
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// One page of a filtered snapshot.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    snapshot: &'a Snapshot,
    indices: Vec<usize>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<'a> Page<'a> {
    /// Records on this page, in filtered order.
    pub fn records(&self) -> impl Iterator<Item = RecordView<'a>> + '_ {
        let snapshot = self.snapshot;
        self.indices
            .iter()
            .filter_map(move |&idx| snapshot.record(idx))
    }

    /// Row indices (into the snapshot) on this page.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

struct Records<'p, 'a>(&'p Page<'a>);

impl Serialize for Records<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.records())
    }
}

impl Serialize for Page<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Page", 5)?;
        s.serialize_field("data", &Records(self))?;
        s.serialize_field("page", &self.page)?;
        s.serialize_field("per_page", &self.per_page)?;
        s.serialize_field("total_items", &self.total_items)?;
        s.serialize_field("total_pages", &self.total_pages)?;
        s.end()
    }
}

/// Filter and paginate `snapshot`. `None` means no data has been loaded.
///
/// Columns skipped during matching are logged once at the end.
pub fn run<'a>(
    snapshot: Option<&'a Snapshot>,
    params: &QueryParams,
    options: &SearchOptions,
) -> Result<Page<'a>, QueryError> {
    let mut diagnostics = MatchDiagnostics::default();
    let page = run_with_diagnostics(snapshot, params, options, &mut diagnostics)?;
    diagnostics.emit(page.snapshot);
    Ok(page)
}

/// [`run`], but skipped columns are recorded into `diagnostics` instead of
/// being logged.
pub fn run_with_diagnostics<'a>(
    snapshot: Option<&'a Snapshot>,
    params: &QueryParams,
    options: &SearchOptions,
    diagnostics: &mut MatchDiagnostics,
) -> Result<Page<'a>, QueryError> {
    let snapshot = snapshot.ok_or(QueryError::Unavailable)?;
    let needle = params.text();

    let matched: Vec<usize> = if needle.is_empty() {
        (0..snapshot.len()).collect()
    } else {
        snapshot
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| row_matches(snapshot, row, needle, options, diagnostics))
            .map(|(idx, _)| idx)
            .collect()
    };

    let total_items = matched.len();
    let total_pages = total_items.div_ceil(params.per_page());
    let start = (params.page() - 1).saturating_mul(params.per_page());
    let indices = if start >= total_items {
        Vec::new()
    } else {
        let end = start.saturating_add(params.per_page()).min(total_items);
        matched[start..end].to_vec()
    };

    tracing::debug!(
        query = %needle,
        page = params.page(),
        per_page = params.per_page(),
        total_items,
        returned = indices.len(),
        "query served"
    );

    Ok(Page {
        snapshot,
        indices,
        page: params.page(),
        per_page: params.per_page(),
        total_items,
        total_pages,
    })
}

/// Column names of `snapshot` in header order.
pub fn list_columns(snapshot: Option<&Snapshot>) -> Result<Vec<&str>, QueryError> {
    snapshot
        .map(Snapshot::column_names)
        .ok_or(QueryError::Unavailable)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
