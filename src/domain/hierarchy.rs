//! Constraint-bounded hierarchy builder.
//!
//! Records are split by category at the top level, then recursively by
//! dominant domain and shared keyword until a branch is small enough or the
//! depth budget is spent.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::domain::entities::{Category, DomainDominance, HierarchyParams, Node, Record, RecordId};

pub const ROOT_LABEL: &str = "Bookmarks";
pub const OTHER_LABEL: &str = "Other resources";
pub const MISC_LABEL: &str = "Divers";

/// Most keyword groups emitted per split.
const MAX_KEYWORD_GROUPS: usize = 3;
/// Smallest group a domain or keyword needs to become a folder.
const MIN_GROUP_SIZE: usize = 2;

/// A named slice of records produced by one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubGroup<'a> {
    pub label: String,
    pub records: Vec<&'a Record>,
}

/// Builds a bookmark tree from classified records.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyBuilder {
    params: HierarchyParams,
    dominance: DomainDominance,
}

impl HierarchyBuilder {
    pub fn new(params: HierarchyParams) -> Self {
        Self {
            params,
            dominance: DomainDominance::default(),
        }
    }

    pub fn with_dominance(mut self, dominance: DomainDominance) -> Self {
        self.dominance = dominance;
        self
    }

    /// Build the full tree. The root is a folder labeled [`ROOT_LABEL`].
    #[instrument(level = "debug", skip_all, fields(records = records.len()))]
    pub fn build(&self, records: &[Record]) -> Node {
        let horizontal = self.params.horizontal_complexity();
        let remaining_depth = self.params.vertical_complexity() - 1;

        let mut groups: Vec<(Category, Vec<&Record>)> = Category::ALL
            .iter()
            .map(|&category| {
                let members = records.iter().filter(|r| r.category == category).collect();
                (category, members)
            })
            .filter(|(_, members): &(Category, Vec<&Record>)| !members.is_empty())
            .collect();
        debug!("build: {} non-empty categories", groups.len());

        let mut branches: Vec<(String, Vec<&Record>)> = Vec::new();
        if groups.len() <= horizontal {
            branches.extend(groups.into_iter().map(|(c, m)| (c.to_string(), m)));
        } else {
            // stable sort keeps category order among equal sizes
            groups.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
            let rest = groups.split_off(horizontal - 1);
            branches.extend(groups.into_iter().map(|(c, m)| (c.to_string(), m)));
            let other: Vec<&Record> = rest.into_iter().flat_map(|(_, m)| m).collect();
            if !other.is_empty() {
                branches.push((OTHER_LABEL.to_string(), other));
            }
        }

        let children: Vec<Node> = branches
            .into_iter()
            .map(|(label, members)| self.build_branch(&label, members, remaining_depth))
            .collect();
        Node::folder(ROOT_LABEL, children, records.len())
    }

    /// Folder labeled `"{label} ({count})"`, split further while budget allows.
    fn build_branch(&self, label: &str, records: Vec<&Record>, remaining_depth: usize) -> Node {
        let horizontal = self.params.horizontal_complexity();
        let count = records.len();
        let label = format!("{label} ({count})");

        if remaining_depth == 0 || count <= horizontal {
            trace!("build_branch: '{}' terminal at depth budget {}", label, remaining_depth);
            let leaves = records.into_iter().map(Node::leaf).collect();
            return Node::folder(label, leaves, count);
        }

        let children = self
            .subgroup(&records, horizontal)
            .into_iter()
            .map(|group| self.build_branch(&group.label, group.records, remaining_depth - 1))
            .collect();
        Node::folder(label, children, count)
    }

    /// Partition `records` by dominant domain, then shared keyword, then the rest.
    pub fn subgroup<'a>(&self, records: &[&'a Record], max_groups: usize) -> Vec<SubGroup<'a>> {
        let mut groups = Vec::new();
        let mut used: HashSet<RecordId> = HashSet::new();

        let floor = self.branch_floor(records.len());
        let mut dominant: Vec<(String, Vec<&'a Record>)> =
            group_in_order(records, |r| vec![r.domain.clone()])
                .into_iter()
                .filter(|(_, members)| members.len() >= floor.max(dominance_floor(members.len())))
                .collect();
        dominant.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        dominant.truncate(max_groups * 6 / 10);

        for (domain, members) in dominant {
            let clean = domain.strip_prefix("www.").unwrap_or(domain.as_str());
            used.extend(members.iter().map(|r| r.id));
            groups.push(SubGroup {
                label: folder_name(clean, members.len()),
                records: members,
            });
        }

        let has_unused = |used: &HashSet<RecordId>| records.iter().any(|r| !used.contains(&r.id));
        if has_unused(&used) && groups.len() < max_groups {
            let budget = (max_groups - groups.len()).min(MAX_KEYWORD_GROUPS);
            let mut candidates: Vec<(String, Vec<&'a Record>)> =
                group_in_order(records, |r| r.keywords.clone())
                    .into_iter()
                    .filter(|(_, members)| members.len() >= MIN_GROUP_SIZE)
                    .filter(|(_, members)| members.iter().any(|r| !used.contains(&r.id)))
                    .collect();
            candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
            candidates.truncate(budget);

            for (keyword, members) in candidates {
                let unused: Vec<&'a Record> = members
                    .into_iter()
                    .filter(|r| !used.contains(&r.id))
                    .collect();
                if unused.len() < MIN_GROUP_SIZE {
                    trace!("subgroup: dropping keyword '{}'", keyword);
                    continue;
                }
                used.extend(unused.iter().map(|r| r.id));
                groups.push(SubGroup {
                    label: format!("{} ({})", capitalize(&keyword), unused.len()),
                    records: unused,
                });
            }
        }

        let rest: Vec<&'a Record> = records
            .iter()
            .copied()
            .filter(|r| !used.contains(&r.id))
            .collect();
        if !rest.is_empty() {
            groups.push(SubGroup {
                label: format!("{MISC_LABEL} ({})", rest.len()),
                records: rest,
            });
        }
        debug!("subgroup: {} records -> {} groups", records.len(), groups.len());
        groups
    }

    /// Size a domain group needs relative to the branch, before the self-referential check.
    fn branch_floor(&self, branch_size: usize) -> usize {
        match self.dominance {
            DomainDominance::Literal => MIN_GROUP_SIZE,
            DomainDominance::Relative => dominance_floor(branch_size),
        }
    }
}

/// `max(2, ceil(0.15 * n))`
fn dominance_floor(n: usize) -> usize {
    (n * 15).div_ceil(100).max(MIN_GROUP_SIZE)
}

/// Group records under every key returned by `keys`, keys in first-seen order.
///
/// A record repeating a key is listed once in that group.
fn group_in_order<'a, F>(records: &[&'a Record], keys: F) -> Vec<(String, Vec<&'a Record>)>
where
    F: Fn(&Record) -> Vec<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a Record>)> = Vec::new();
    for &record in records {
        for key in keys(record) {
            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            let members = &mut groups[slot].1;
            if members.last().map(|r| r.id) != Some(record.id) {
                members.push(record);
            }
        }
    }
    groups
}

/// `"Github - 3 liens"` for domains, `"Rust - 3 ressources"` for keywords.
pub fn folder_name(identifier: &str, count: usize) -> String {
    match identifier.split_once('.') {
        Some((site, _)) => format!("{} - {count} liens", capitalize(site)),
        None => format!("{} - {count} ressources", capitalize(identifier)),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
