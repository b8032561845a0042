//! Domain entities: core data structures

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Topical category assigned to every bookmark.
///
/// Declaration order is significant: it is the rule-matching priority and
/// the default ordering of top-level folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Videos & Multimedia")]
    VideosMultimedia,
    #[serde(rename = "Development & Code")]
    DevelopmentCode,
    #[serde(rename = "Documentation & Help")]
    DocumentationHelp,
    #[serde(rename = "E-commerce & Shopping")]
    EcommerceShopping,
    #[serde(rename = "News & Blog")]
    NewsBlog,
    #[serde(rename = "Social Networks")]
    SocialNetworks,
    #[serde(rename = "Cloud & Storage")]
    CloudStorage,
    #[serde(rename = "Tools & Utilities")]
    ToolsUtilities,
    #[serde(rename = "Formation & Learning")]
    FormationLearning,
    #[serde(rename = "Various Resources")]
    VariousResources,
}

impl Category {
    /// All categories in priority order, fallback last.
    pub const ALL: [Category; 10] = [
        Category::VideosMultimedia,
        Category::DevelopmentCode,
        Category::DocumentationHelp,
        Category::EcommerceShopping,
        Category::NewsBlog,
        Category::SocialNetworks,
        Category::CloudStorage,
        Category::ToolsUtilities,
        Category::FormationLearning,
        Category::VariousResources,
    ];

    /// Category assigned when no rule matches.
    pub const FALLBACK: Category = Category::VariousResources;

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::VideosMultimedia => "Videos & Multimedia",
            Category::DevelopmentCode => "Development & Code",
            Category::DocumentationHelp => "Documentation & Help",
            Category::EcommerceShopping => "E-commerce & Shopping",
            Category::NewsBlog => "News & Blog",
            Category::SocialNetworks => "Social Networks",
            Category::CloudStorage => "Cloud & Storage",
            Category::ToolsUtilities => "Tools & Utilities",
            Category::FormationLearning => "Formation & Learning",
            Category::VariousResources => "Various Resources",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a record, assigned at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

/// A classified bookmark. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// Title as shown in the browser
    pub title: String,
    /// Absolute http(s) URL
    pub url: String,
    pub category: Category,
    /// At most 3 lowercase words taken from the title
    pub keywords: Vec<String>,
    /// Lowercased hostname
    pub domain: String,
}

/// Anchor extracted from a bookmark export, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub title: String,
    pub url: String,
}

impl RawLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Link dropped during record construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLink {
    pub url: String,
    pub reason: String,
}

/// Node in the bookmark hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(Folder),
    Leaf(Leaf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub label: String,
    /// Order is reproduced verbatim by the serializer
    pub children: Vec<Node>,
    pub child_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub label: String,
    pub record: Record,
}

impl Node {
    pub fn folder(label: impl Into<String>, children: Vec<Node>, child_count: usize) -> Self {
        Node::Folder(Folder {
            label: label.into(),
            children,
            child_count,
        })
    }

    pub fn leaf(record: &Record) -> Self {
        Node::Leaf(Leaf {
            label: record.title.clone(),
            record: record.clone(),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.label,
            Node::Leaf(leaf) => &leaf.label,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Folder(folder) => &folder.children,
            Node::Leaf(_) => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Records of all leaves, depth-first in child order.
    pub fn records(&self) -> Vec<&Record> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf(leaf) => out.push(&leaf.record),
                Node::Folder(folder) => stack.extend(folder.children.iter().rev()),
            }
        }
        out
    }

    /// Depth of the deepest folder, root = 0.
    pub fn folder_depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Folder(folder) => folder
                .children
                .iter()
                .filter(|c| !c.is_leaf())
                .map(|c| c.folder_depth() + 1)
                .max()
                .unwrap_or(0),
        }
    }
}

/// Complexity bounds for the hierarchy builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyParams {
    vertical_complexity: usize,
    horizontal_complexity: usize,
}

impl HierarchyParams {
    pub const VERTICAL_RANGE: RangeInclusive<usize> = 2..=8;
    pub const HORIZONTAL_RANGE: RangeInclusive<usize> = 3..=15;

    /// Validated constructor.
    pub fn new(vertical_complexity: usize, horizontal_complexity: usize) -> DomainResult<Self> {
        check_range("vertical", vertical_complexity, &Self::VERTICAL_RANGE)?;
        check_range("horizontal", horizontal_complexity, &Self::HORIZONTAL_RANGE)?;
        Ok(Self {
            vertical_complexity,
            horizontal_complexity,
        })
    }

    /// Maximum folder depth below the root.
    pub fn vertical_complexity(&self) -> usize {
        self.vertical_complexity
    }

    /// Maximum sibling groups, and the "small enough to stop splitting" size.
    pub fn horizontal_complexity(&self) -> usize {
        self.horizontal_complexity
    }
}

impl Default for HierarchyParams {
    fn default() -> Self {
        Self {
            vertical_complexity: 4,
            horizontal_complexity: 8,
        }
    }
}

fn check_range(name: &'static str, value: usize, range: &RangeInclusive<usize>) -> DomainResult<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(DomainError::ParamOutOfRange {
            name,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Threshold used to decide whether a domain gets its own sub-folder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainDominance {
    /// `size >= max(2, ceil(0.15 * size))`, i.e. any domain with 2+ bookmarks
    #[default]
    Literal,
    /// `size >= max(2, ceil(0.15 * branch size))`
    Relative,
}

/// What survives into the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub include_bookmarks: bool,
    pub include_folders: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_bookmarks: true,
            include_folders: true,
        }
    }
}

impl ExportOptions {
    pub fn is_full(&self) -> bool {
        self.include_bookmarks && self.include_folders
    }

    /// Tag used in export filenames; `None` for the full export.
    pub fn variant_tag(&self) -> Option<&'static str> {
        match (self.include_bookmarks, self.include_folders) {
            (true, true) => None,
            (false, true) => Some("folders-only"),
            (true, false) => Some("flattened"),
            (false, false) => Some("empty"),
        }
    }
}

/// Aggregate numbers over a set of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkStats {
    pub total_bookmarks: usize,
    /// Every category in priority order, zero counts included
    pub per_category: Vec<(Category, usize)>,
    pub unique_domains: usize,
}
