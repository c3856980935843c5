//! Multi-page PDF report, one page per product.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::DailySummary;

use super::canvas::FONT_NAME;
use super::chart::{render_product_page, PAGE_SIZE};

/// A PDF being assembled for one report run.
///
/// The output file is created up front and held open. Pages accumulate in
/// memory and are written by [`finish`](Self::finish). A document dropped
/// without `finish` still writes the pages rendered so far.
pub struct ReportDocument {
    path: PathBuf,
    title: String,
    file: Option<BufWriter<File>>,
    pages: Vec<Vec<u8>>,
}

impl ReportDocument {
    /// Create (truncate) the output file at `path`.
    pub fn create<P: AsRef<Path>>(path: P, title: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        info!(path = %path.display(), "saving report");
        Ok(Self {
            path,
            title: title.to_string(),
            file: Some(BufWriter::new(file)),
            pages: Vec::new(),
        })
    }

    /// Render the three-panel page for `product`.
    ///
    /// Returns `false` without adding a page when `summaries` is empty.
    pub fn add_product(&mut self, product: &str, summaries: &[DailySummary]) -> Result<bool> {
        if summaries.is_empty() {
            info!(product, "no valid data for product; skipping plot");
            return Ok(false);
        }

        let mut content = Content::new();
        render_product_page(&mut content, product, summaries)?;
        self.pages.push(compress(&content.finish())?);
        Ok(true)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the PDF, flush and close the file.
    pub fn finish(mut self) -> Result<PathBuf> {
        self.write_out()?;
        info!(path = %self.path.display(), pages = self.pages.len(), "report saved");
        Ok(self.path.clone())
    }

    fn write_out(&mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.write_all(&assemble(&self.title, &self.pages))?;
            file.flush()?;
        }
        Ok(())
    }
}

impl Drop for ReportDocument {
    fn drop(&mut self) {
        if self.file.is_some() {
            if let Err(e) = self.write_out() {
                warn!(path = %self.path.display(), error = %e, "failed to write partial report");
            }
        }
    }
}

fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Serialize pages (already zlib-compressed content streams) into a PDF file.
fn assemble(title: &str, pages: &[Vec<u8>]) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let font_id = Ref::new(3);
    let info_id = Ref::new(4);

    let page_ids: Vec<(Ref, Ref)> = (0..pages.len() as i32)
        .map(|i| (Ref::new(5 + 2 * i), Ref::new(6 + 2 * i)))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(pages.len() as i32);
    pdf.type1_font(font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.document_info(info_id).title(TextStr(title));

    let media_box = Rect::new(0.0, 0.0, PAGE_SIZE.0 as f32, PAGE_SIZE.1 as f32);
    for ((page_id, content_id), data) in page_ids.iter().zip(pages) {
        let mut page = pdf.page(*page_id);
        page.media_box(media_box);
        page.parent(tree_id);
        page.contents(*content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        pdf.stream(*content_id, data).filter(Filter::FlateDecode);
    }

    pdf.finish()
}
