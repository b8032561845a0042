//! Command dispatch: wires CLI arguments to the organizer service

use std::path::{Path, PathBuf};

use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::services::default_filename;
use crate::cli::args::{Cli, Commands, ConfigCommands, HierarchyArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{DomainDominance, ExportOptions, HierarchyParams, Node, SkippedLink};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Config { command }) => cmd_config(command, cli.config.as_deref()),
        Some(Commands::Completion { .. }) | None => Ok(()),
        Some(command) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(settings)?;
            match command {
                Commands::Convert {
                    input,
                    output,
                    hierarchy,
                    no_bookmarks,
                    no_folders,
                } => cmd_convert(
                    &container,
                    input,
                    output.as_deref(),
                    hierarchy,
                    *no_bookmarks,
                    *no_folders,
                ),
                Commands::Tree { input, hierarchy } => cmd_tree(&container, input, hierarchy),
                Commands::Stats { input } => cmd_stats(&container, input),
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
    }
}

/// Settings first, CLI flags on top.
fn resolve_hierarchy(
    settings: &Settings,
    args: &HierarchyArgs,
) -> CliResult<(HierarchyParams, DomainDominance)> {
    let vertical = args
        .vertical
        .map(usize::from)
        .unwrap_or(settings.hierarchy.vertical);
    let horizontal = args
        .horizontal
        .map(usize::from)
        .unwrap_or(settings.hierarchy.horizontal);
    let params = HierarchyParams::new(vertical, horizontal)?;
    let dominance = args
        .dominance
        .map(DomainDominance::from)
        .unwrap_or(settings.hierarchy.dominance);
    Ok((params, dominance))
}

/// Settings first, CLI flags on top.
///
/// Without bookmarks every folder is left empty and the filter drops it,
/// so such a request is rejected before any input is read.
fn resolve_export_options(
    settings: &Settings,
    no_bookmarks: bool,
    no_folders: bool,
) -> CliResult<ExportOptions> {
    let defaults = settings.export_options();
    let options = ExportOptions {
        include_bookmarks: defaults.include_bookmarks && !no_bookmarks,
        include_folders: defaults.include_folders && !no_folders,
    };
    if !options.include_bookmarks {
        return Err(CliError::Usage(
            "excluding bookmarks leaves every folder empty, nothing would be exported \
             (check --no-bookmarks and export.include_bookmarks)"
                .into(),
        ));
    }
    Ok(options)
}

fn report_skipped(skipped: &[SkippedLink]) {
    if skipped.is_empty() {
        return;
    }
    output::warning(&format!("{} link(s) skipped", skipped.len()));
    for link in skipped {
        output::detail(&format!("{}: {}", link.url, link.reason));
    }
}

#[instrument(skip(container))]
fn cmd_convert(
    container: &ServiceContainer,
    input: &Path,
    output_path: Option<&Path>,
    hierarchy: &HierarchyArgs,
    no_bookmarks: bool,
    no_folders: bool,
) -> CliResult<()> {
    let settings = &container.settings;
    let (params, dominance) = resolve_hierarchy(settings, hierarchy)?;

    let options = resolve_export_options(settings, no_bookmarks, no_folders)?;

    let output_path = match output_path {
        Some(path) => path.to_path_buf(),
        None => default_output_path(&settings.export.output_dir, &options),
    };
    debug!("output: {}", output_path.display());

    let report = container
        .organizer
        .convert(input, &output_path, params, dominance, &options)?;

    report_skipped(&report.skipped);
    output::success(&format!(
        "{} bookmarks organized into {}",
        report.records,
        report.output.display()
    ));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, input: &Path, hierarchy: &HierarchyArgs) -> CliResult<()> {
    let (params, dominance) = resolve_hierarchy(&container.settings, hierarchy)?;
    let loaded = container.organizer.load(input)?;
    report_skipped(&loaded.skipped);

    let tree = container.organizer.organize(&loaded.records, params, dominance);
    output::info(&to_tree_string(&tree));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_stats(container: &ServiceContainer, input: &Path) -> CliResult<()> {
    let loaded = container.organizer.load(input)?;
    report_skipped(&loaded.skipped);

    let stats = container.organizer.stats(&loaded.records);
    output::header(&format!("{} bookmarks", stats.total_bookmarks));
    for (category, count) in stats.detected() {
        output::detail(&format!("{category:<28} {count:>5}"));
    }
    output::info(&format!("{} unique domains", stats.unique_domains));
    Ok(())
}

fn cmd_config(command: &ConfigCommands, local_config: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(local_config)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init => {
            output::info(&Settings::template());
        }
        ConfigCommands::Path => {
            let global = global_config_path()
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            output::action("global", &display_with_presence(&global));
            if let Some(local) = local_config {
                output::action("local", &display_with_presence(local));
            }
        }
    }
    Ok(())
}

fn display_with_presence(path: &Path) -> String {
    if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found)", path.display())
    }
}

/// Terminal rendering of an organized tree.
pub fn to_tree_string(node: &Node) -> Tree<String> {
    match node {
        Node::Leaf(leaf) => Tree::new(format!("{} <{}>", leaf.label, leaf.record.url)),
        Node::Folder(folder) => {
            Tree::new(folder.label.clone()).with_leaves(folder.children.iter().map(to_tree_string))
        }
    }
}

/// Default output location inside `dir`, dated today.
pub fn default_output_path(dir: &Path, options: &ExportOptions) -> PathBuf {
    let today = chrono::Local::now().date_naive();
    dir.join(default_filename(options, today))
}
