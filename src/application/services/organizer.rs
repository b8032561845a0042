//! Bookmark organizer service
//!
//! Runs the pipeline export file → records → hierarchy → filter → FreeMind document.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{
    extract_links, filter_tree, freemind, BookmarkStats, Classifier, DomainDominance, DomainError,
    ExportOptions, HierarchyBuilder, HierarchyParams, Node, RawLink, Record, RuleTable,
    SkippedLink,
};
use crate::infrastructure::traits::FileSystem;

const FILENAME_PREFIX: &str = "bookmarks_reorganized";
const FILENAME_EXTENSION: &str = "mm";

/// Records accepted from an export, plus the links that were rejected.
#[derive(Debug, Clone)]
pub struct LoadedBookmarks {
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedLink>,
}

/// Summary of a completed conversion.
#[derive(Debug, Clone)]
pub struct ConvertReport {
    pub output: PathBuf,
    pub records: usize,
    pub skipped: Vec<SkippedLink>,
    pub bytes: usize,
}

/// Service orchestrating classification, hierarchy building and export.
pub struct OrganizerService {
    fs: Arc<dyn FileSystem>,
    classifier: Classifier,
}

impl OrganizerService {
    /// Create a new organizer service.
    pub fn new(fs: Arc<dyn FileSystem>, classifier: Classifier) -> Self {
        Self { fs, classifier }
    }

    /// Create a service using the rule table at `rules_file`, or the built-in table.
    pub fn with_rules_file(
        fs: Arc<dyn FileSystem>,
        rules_file: Option<&Path>,
    ) -> ApplicationResult<Self> {
        let table = match rules_file {
            Some(path) => {
                debug!("loading rule table: {}", path.display());
                let content = fs
                    .read_to_string(path)
                    .with_path_context("read rule table", path)?;
                RuleTable::from_toml(&content)?
            }
            None => RuleTable::builtin(),
        };
        Ok(Self::new(fs, Classifier::new(table)))
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Classify raw links. An empty result is an error.
    pub fn classify_links(&self, links: &[RawLink]) -> ApplicationResult<LoadedBookmarks> {
        let batch = self.classifier.build_records(links);
        if batch.records.is_empty() {
            return Err(DomainError::NothingToClassify.into());
        }
        Ok(LoadedBookmarks {
            records: batch.records,
            skipped: batch.skipped,
        })
    }

    /// Read a bookmark export and classify every link in it.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, export: &Path) -> ApplicationResult<LoadedBookmarks> {
        if !self.fs.is_file(export) {
            return Err(ApplicationError::InputNotFound(export.to_path_buf()));
        }
        let html = self
            .fs
            .read_to_string(export)
            .with_path_context("read bookmark export", export)?;
        let links = extract_links(&html);
        info!("{}: {} links extracted", export.display(), links.len());
        self.classify_links(&links)
    }

    /// Build the hierarchy for `records`.
    pub fn organize(
        &self,
        records: &[Record],
        params: HierarchyParams,
        dominance: DomainDominance,
    ) -> Node {
        HierarchyBuilder::new(params)
            .with_dominance(dominance)
            .build(records)
    }

    /// Apply export options. The tree is borrowed unchanged for a full export.
    pub fn export<'a>(
        &self,
        tree: &'a Node,
        options: &ExportOptions,
    ) -> ApplicationResult<Cow<'a, Node>> {
        if options.is_full() {
            return Ok(Cow::Borrowed(tree));
        }
        filter_tree(tree, options)
            .map(Cow::Owned)
            .ok_or(ApplicationError::NothingToExport)
    }

    pub fn render(&self, tree: &Node) -> String {
        freemind::render(tree)
    }

    /// Write a rendered document, creating parent directories.
    pub fn write(&self, output: &Path, document: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(output)
            .with_path_context("create output directory", output)?;
        self.fs
            .write(output, document)
            .with_path_context("write mind map", output)
    }

    pub fn stats(&self, records: &[Record]) -> BookmarkStats {
        BookmarkStats::from_records(records)
    }

    /// Full pipeline: load, organize, filter, render, write.
    #[instrument(level = "debug", skip(self))]
    pub fn convert(
        &self,
        export: &Path,
        output: &Path,
        params: HierarchyParams,
        dominance: DomainDominance,
        options: &ExportOptions,
    ) -> ApplicationResult<ConvertReport> {
        let loaded = self.load(export)?;
        for skipped in &loaded.skipped {
            warn!("skipped {}: {}", skipped.url, skipped.reason);
        }
        let tree = self.organize(&loaded.records, params, dominance);
        let tree = self.export(&tree, options)?;
        let document = self.render(&tree);
        self.write(output, &document)?;
        info!("wrote {} ({} bytes)", output.display(), document.len());

        Ok(ConvertReport {
            output: output.to_path_buf(),
            records: loaded.records.len(),
            skipped: loaded.skipped,
            bytes: document.len(),
        })
    }
}

/// `bookmarks_reorganized_2024-01-15.mm`, with a variant tag for partial exports.
pub fn default_filename(options: &ExportOptions, date: NaiveDate) -> String {
    let date = date.format("%Y-%m-%d");
    match options.variant_tag() {
        None => format!("{FILENAME_PREFIX}_{date}.{FILENAME_EXTENSION}"),
        Some(tag) => format!("{FILENAME_PREFIX}_{date}_{tag}.{FILENAME_EXTENSION}"),
    }
}
