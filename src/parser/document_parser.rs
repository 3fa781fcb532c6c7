//! Document-level driver: page source in, classified document out.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Document, ExtractionStage, Page, PageFailure};
use crate::parser::ImageDescriptor;
use crate::pipeline::PageAssembler;

use super::backend::PageSource;
use super::options::{ErrorMode, ParseOptions};

/// Extracted inputs for one page, ready for assembly.
#[derive(Debug, Clone)]
struct PageInput {
    page_number: u32,
    lines: Vec<String>,
    images: Vec<ImageDescriptor>,
}

/// Runs the page pipeline over every selected page of a [`PageSource`].
///
/// Extraction is done page by page in document order. Assembly of the
/// extracted pages is independent per page and runs on rayon when
/// `options.parallel` is set; the resulting pages are always ordered by page
/// number.
pub struct DocumentParser<S: PageSource> {
    source: S,
    options: ParseOptions,
    assembler: PageAssembler,
}

impl<S: PageSource> DocumentParser<S> {
    /// Create a parser with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a parser with custom options.
    pub fn with_options(source: S, options: ParseOptions) -> Self {
        let assembler = PageAssembler::with_thresholds(options.density);
        Self {
            source,
            options,
            assembler,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The underlying page source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Parse all selected pages into a document.
    pub fn parse(&self) -> Result<Document> {
        let mut document = Document::new();

        let inputs = self.extract_inputs(&mut document.failures)?;
        let mut pages = if self.options.parallel && inputs.len() > 1 {
            self.assemble_parallel(&inputs)?
        } else {
            inputs.iter().map(|input| self.assemble(input)).collect()
        };
        pages.sort_by_key(|page| page.page_number);
        document.pages = pages;

        log::info!(
            "parsed {} pages ({} with extraction failures)",
            document.page_count(),
            document.failures.len()
        );
        Ok(document)
    }

    /// Parse a single page by number, ignoring the page selection.
    pub fn parse_page(&self, page_number: u32) -> Result<Page> {
        let lines = self.source.lines(page_number)?;
        let images = self.source.images(page_number)?;
        Ok(self.assembler.assemble(page_number, &lines, &images))
    }

    fn extract_inputs(&self, failures: &mut Vec<PageFailure>) -> Result<Vec<PageInput>> {
        let mut inputs = Vec::new();

        for page_number in self.source.page_numbers() {
            if !self.options.pages.includes(page_number) {
                continue;
            }
            log::debug!("processing page {}", page_number);

            let lines = match self.source.lines(page_number) {
                Ok(lines) => lines,
                Err(e) => {
                    self.record_failure(page_number, ExtractionStage::Text, e, failures)?;
                    Vec::new()
                }
            };
            let images = match self.source.images(page_number) {
                Ok(images) => images,
                Err(e) => {
                    self.record_failure(page_number, ExtractionStage::Images, e, failures)?;
                    Vec::new()
                }
            };

            inputs.push(PageInput {
                page_number,
                lines,
                images,
            });
        }

        Ok(inputs)
    }

    /// Strict mode returns the error; lenient mode logs and records it.
    fn record_failure(
        &self,
        page_number: u32,
        stage: ExtractionStage,
        error: Error,
        failures: &mut Vec<PageFailure>,
    ) -> Result<()> {
        if self.options.error_mode == ErrorMode::Strict {
            return Err(error);
        }
        log::warn!(
            "Failed to extract {} from page {}: {}",
            stage,
            page_number,
            error
        );
        failures.push(PageFailure {
            page_number,
            stage,
            message: error.to_string(),
        });
        Ok(())
    }

    fn assemble(&self, input: &PageInput) -> Page {
        self.assembler
            .assemble(input.page_number, &input.lines, &input.images)
    }

    fn assemble_parallel(&self, inputs: &[PageInput]) -> Result<Vec<Page>> {
        let assembler = &self.assembler;
        let run = || {
            inputs
                .par_iter()
                .map(|input| assembler.assemble(input.page_number, &input.lines, &input.images))
                .collect::<Vec<_>>()
        };

        match self.options.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::Other(format!("Failed to build worker pool: {}", e)))?;
                Ok(pool.install(run))
            }
            None => Ok(run()),
        }
    }
}
