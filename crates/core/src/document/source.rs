//! Page content sources.

use crate::error::{PdfError, Result};

/// The content stream of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    /// 1-based page index
    pub page: usize,
    /// Decoded content stream bytes; multiple streams are joined with a space
    pub data: Vec<u8>,
}

/// Yields the ordered per-page content streams of a document.
pub trait PageSource: Sync {
    fn pages(&self, document: &[u8]) -> Result<Vec<PageContent>>;
}

/// PDF page source backed by `lopdf`.
///
/// Content streams are returned with their filters decoded. Encrypted
/// documents are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfSource;

impl PageSource for LopdfSource {
    fn pages(&self, document: &[u8]) -> Result<Vec<PageContent>> {
        if document.len() < 8 || !document.starts_with(b"%PDF-") {
            return Err(PdfError::Document("invalid PDF header".to_string()));
        }

        let doc = lopdf::Document::load_mem(document)?;
        if doc.is_encrypted() {
            return Err(PdfError::Encrypted);
        }

        // get_pages is keyed by page number, already in document order
        let mut pages = Vec::new();
        for (index, (number, page_id)) in doc.get_pages().into_iter().enumerate() {
            let data = page_content(&doc, page_id)
                .map_err(|e| PdfError::Document(format!("page {number}: {e}")))?;
            pages.push(PageContent {
                page: index + 1,
                data,
            });
        }
        tracing::debug!(pages = pages.len(), "loaded page contents");
        Ok(pages)
    }
}

/// Decode and join the `/Contents` streams of a page.
///
/// Streams are separated by a space so a token never spans two streams.
fn page_content(
    doc: &lopdf::Document,
    page_id: lopdf::ObjectId,
) -> std::result::Result<Vec<u8>, String> {
    let mut content = Vec::new();
    for id in doc.get_page_contents(page_id) {
        let stream = doc
            .get_object(id)
            .and_then(lopdf::Object::as_stream)
            .map_err(|e| format!("content stream {} {} R: {e}", id.0, id.1))?;
        let bytes = decode_stream(stream)
            .map_err(|e| format!("cannot decode content stream {} {} R: {e}", id.0, id.1))?;
        if !content.is_empty() {
            content.push(b' ');
        }
        content.extend_from_slice(&bytes);
    }
    Ok(content)
}

fn decode_stream(stream: &lopdf::Stream) -> lopdf::Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        stream.decompressed_content()
    } else {
        Ok(stream.content.clone())
    }
}

/// In-memory page source: one content stream per page, ignoring the
/// document bytes.
#[derive(Debug, Clone, Default)]
pub struct RawPages {
    streams: Vec<Vec<u8>>,
}

impl RawPages {
    pub fn new<I, S>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            streams: streams.into_iter().map(Into::into).collect(),
        }
    }
}

impl PageSource for RawPages {
    fn pages(&self, _document: &[u8]) -> Result<Vec<PageContent>> {
        Ok(self
            .streams
            .iter()
            .enumerate()
            .map(|(i, data)| PageContent {
                page: i + 1,
                data: data.clone(),
            })
            .collect())
    }
}
