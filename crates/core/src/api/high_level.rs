//! High-level conversion API.
//!
//! - `convert()` - PDF bytes to xlsx bytes with default options
//! - `Converter` - configurable pipeline over any [`PageSource`]
//! - `write_artifact()` - persist a workbook under a unique name

use std::path::{Path, PathBuf};

use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use crate::document::{LopdfSource, PageContent, PageSource};
use crate::error::{LexError, PdfError, Result};
use crate::extract::{ExtractStats, PageText, TextOperators, extract_page_text};
use crate::sheet::{FillStyle, TabularDocument, TabularRenderer};
use crate::xlsx::XlsxBuilder;

/// Default highlight fill applied to every populated row.
pub const DEFAULT_FILL_COLOR: &str = "1F497D";

/// What to do when a page's content stream cannot be tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageErrorPolicy {
    /// Fail the whole conversion
    #[default]
    Abort,
    /// Log a warning and give the page an empty row
    SkipPage,
}

/// Options for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Target sheet name.
    pub sheet_name: String,

    /// Highlight fill colour, `RRGGBB` or `#RRGGBB`.
    pub fill_color: String,

    /// Operators treated as text-show operations.
    pub text_operators: TextOperators,

    /// Handling of pages with malformed content streams.
    pub on_page_error: PageErrorPolicy,

    /// Worker threads for page extraction. None or 1 extracts sequentially.
    pub threads: Option<usize>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            sheet_name: crate::xlsx::DEFAULT_SHEET_NAME.to_string(),
            fill_color: DEFAULT_FILL_COLOR.to_string(),
            text_operators: TextOperators::Minimal,
            on_page_error: PageErrorPolicy::Abort,
            threads: None,
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The tabular model the workbook was written from
    pub document: TabularDocument,
    /// Serialized xlsx bytes
    pub bytes: Vec<u8>,
    /// Extraction counters summed over all pages
    pub stats: ExtractStats,
    /// Number of pages converted
    pub pages: usize,
    /// Pages left empty because their content stream was malformed
    pub skipped_pages: Vec<usize>,
}

/// Configurable conversion pipeline.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert a PDF read with [`LopdfSource`].
    pub fn convert(&self, document: &[u8]) -> Result<Conversion> {
        self.convert_with(&LopdfSource, document)
    }

    /// Convert a document whose pages come from `source`.
    pub fn convert_with<S: PageSource>(&self, source: &S, document: &[u8]) -> Result<Conversion> {
        let highlight = FillStyle::solid(&self.options.fill_color)?;
        let contents = source.pages(document)?;

        let (texts, stats, skipped_pages) = self.extract(&contents)?;
        let tabular = self.render(&texts, highlight)?;

        let mut builder = XlsxBuilder::new();
        builder.add_sheet(&self.options.sheet_name)?;
        let bytes = tabular.write_to(builder)?;

        tracing::info!(
            pages = texts.len(),
            shown = stats.shown,
            skipped_operations = stats.skipped,
            skipped_pages = skipped_pages.len(),
            "conversion finished"
        );
        Ok(Conversion {
            document: tabular,
            bytes,
            stats,
            pages: texts.len(),
            skipped_pages,
        })
    }

    /// Extract the text of every page, in page order.
    pub fn extract(&self, contents: &[PageContent]) -> Result<(Vec<PageText>, ExtractStats, Vec<usize>)> {
        let operators = self.options.text_operators;
        let extract_one = |content: &PageContent| -> std::result::Result<(PageText, ExtractStats), LexError> {
            extract_page_text(content.page, &content.data, operators)
        };

        let results: Vec<_> = match self.options.threads {
            Some(threads) if threads > 1 && contents.len() > 1 => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| PdfError::ThreadPool(e.to_string()))?;
                pool.install(|| contents.par_iter().map(extract_one).collect())
            }
            _ => contents.iter().map(extract_one).collect(),
        };

        let mut texts = Vec::with_capacity(results.len());
        let mut total = ExtractStats::default();
        let mut skipped_pages = Vec::new();
        for (content, result) in contents.iter().zip(results) {
            match result {
                Ok((text, stats)) => {
                    total.merge(&stats);
                    texts.push(text);
                }
                Err(source) => match self.options.on_page_error {
                    PageErrorPolicy::Abort => {
                        return Err(PdfError::Tokenize {
                            page: content.page,
                            source,
                        });
                    }
                    PageErrorPolicy::SkipPage => {
                        tracing::warn!(page = content.page, error = %source, "skipping malformed page");
                        skipped_pages.push(content.page);
                        texts.push(PageText::new(content.page, ""));
                    }
                },
            }
        }
        Ok((texts, total, skipped_pages))
    }

    /// Map page text onto sheet rows.
    pub fn render(&self, texts: &[PageText], highlight: FillStyle) -> Result<TabularDocument> {
        let mut renderer = TabularRenderer::new(&self.options.sheet_name, highlight)?;
        for text in texts {
            renderer.push(text)?;
        }
        Ok(renderer.finish())
    }
}

/// Convert PDF bytes to xlsx bytes with default options.
///
/// # Example
/// ```ignore
/// let pdf = std::fs::read("report.pdf")?;
/// let xlsx = pdfsheet_core::convert(&pdf)?;
/// std::fs::write("report.xlsx", xlsx)?;
/// ```
pub fn convert(document: &[u8]) -> Result<Vec<u8>> {
    Converter::default().convert(document).map(|c| c.bytes)
}

/// Write workbook bytes to a new, uniquely named `result-*.xlsx` file in
/// `dir` and return its path. Concurrent callers never share a file.
pub fn write_artifact(bytes: &[u8], dir: &Path) -> Result<PathBuf> {
    use std::io::Write;

    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::Builder::new()
        .prefix("result-")
        .suffix(".xlsx")
        .tempfile_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    let (_, path) = file.keep().map_err(|e| PdfError::Io(e.error))?;
    tracing::debug!(path = %path.display(), "artifact written");
    Ok(path)
}
