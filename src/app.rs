use crate::cli::{Cli, Commands, ScanArgs};
use crate::errors::IncludeTreeError;
use crate::graph::resolver::{ArtifactResolver, DEFAULT_EXTENSIONS};
use crate::graph::traversal::IncludeTree;
use crate::graph::{DependencyCache, NodeStatus, TreeEvent};
use crate::utils::config::{self, Config, OutputFormat};
use crate::utils::{file_walker, logging, table};
use crate::visualization::{DotRenderer, JsonRenderer, TextRenderer, TreeRenderer};
use clap::CommandFactory;
use clap_complete::generate;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default entry-point marker.
pub const DEFAULT_ENTRY_MARKER: &str = "int main(";

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    logging::init_logging(cli.verbosity());
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
            0
        }
        Commands::Scan(args) => match scan(&args) {
            Ok(_) => 0,
            Err(e @ IncludeTreeError::NoSuchDirectory(_)) => {
                eprintln!("{e}");
                eprintln!("Run with --help for usage.");
                1
            }
            Err(e) => {
                eprintln!("Scan failed: {e}");
                1
            }
        },
    }
}

/// Effective scan settings: CLI flags over config file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub extensions: Vec<String>,
    pub entry_marker: String,
    pub format: OutputFormat,
    pub separator: bool,
}

impl ScanSettings {
    #[must_use]
    pub fn merge(args: &ScanArgs, config: Option<&Config>) -> Self {
        let cfg_extensions =
            config.and_then(|c| c.resolve.as_ref()).and_then(|r| r.extensions.clone());
        let cfg_output = config.and_then(|c| c.output.as_ref());
        Self {
            extensions: args
                .extensions
                .clone()
                .or(cfg_extensions)
                .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()),
            entry_marker: args
                .entry_marker
                .clone()
                .or_else(|| config.and_then(|c| c.entry_marker.clone()))
                .unwrap_or_else(|| DEFAULT_ENTRY_MARKER.to_string()),
            format: args
                .format
                .or_else(|| cfg_output.and_then(|o| o.format))
                .unwrap_or(OutputFormat::Text),
            separator: !args.no_separator && cfg_output.and_then(|o| o.separator).unwrap_or(true),
        }
    }
}

/// Per entry point counts for `--summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSummary {
    pub entry: String,
    pub nodes: usize,
    pub external: usize,
    pub missing: usize,
    pub circular: usize,
    pub unreadable: usize,
}

impl TreeSummary {
    fn new(entry: &str) -> Self {
        Self { entry: entry.to_string(), ..Self::default() }
    }

    fn record(&mut self, event: &TreeEvent) {
        self.nodes += 1;
        match event.status {
            NodeStatus::Normal => {}
            NodeStatus::External => self.external += 1,
            NodeStatus::Missing => self.missing += 1,
            NodeStatus::Circular => self.circular += 1,
        }
    }
}

/// Scan `args.dir`, render one tree per entry point, and return the per-tree counts.
///
/// # Errors
/// Returns `IncludeTreeError` when the directory does not exist, the
/// configuration is invalid, or output cannot be written. Unreadable source
/// files are not errors; they are logged and counted.
pub fn scan(args: &ScanArgs) -> Result<Vec<TreeSummary>, IncludeTreeError> {
    if !args.dir.is_dir() {
        return Err(IncludeTreeError::NoSuchDirectory(args.dir.clone()));
    }
    let config = match &args.config {
        Some(path) => Some(config::load_config_at(path)?),
        None => config::load_config_near(&args.dir)?,
    };
    let settings = ScanSettings::merge(args, config.as_ref());

    let resolver = ArtifactResolver::new(&args.dir).with_extensions(&settings.extensions);
    let candidates = file_walker::source_files(&args.dir, args.no_ignore, &resolver);
    let entries = file_walker::entry_points(&candidates, &settings.entry_marker);
    tracing::info!(candidates = candidates.len(), entries = entries.len(), "discovered entry points");

    let out = open_output(args.output.as_deref())?;
    let mut renderer = make_renderer(settings.format, out, settings.separator);
    let tree = IncludeTree::new(resolver);
    let mut cache = DependencyCache::new();
    let summaries = render_trees(&tree, &mut cache, &entries, renderer.as_mut())?;

    let stats = cache.stats();
    tracing::info!(
        files_read = stats.files_read,
        hits = stats.hits,
        misses = stats.misses,
        "scan complete"
    );
    if args.summary {
        eprintln!("{}", summary_table(&summaries));
    }
    Ok(summaries)
}

/// Walk each entry point against one shared cache, feeding `renderer`.
///
/// # Errors
/// Returns `IncludeTreeError::Io` if the renderer fails to write.
pub fn render_trees(
    tree: &IncludeTree,
    cache: &mut DependencyCache,
    entries: &[PathBuf],
    renderer: &mut dyn TreeRenderer,
) -> Result<Vec<TreeSummary>, IncludeTreeError> {
    let mut summaries = Vec::with_capacity(entries.len());
    for entry in entries {
        let label = tree.resolver().canonical_label(entry);
        tracing::info!(entry = %label, "printing include tree");
        renderer.begin_tree(&label)?;
        let mut summary = TreeSummary::new(&label);
        let mut traversal = tree.traverse(cache, entry);
        for event in traversal.by_ref() {
            summary.record(&event);
            renderer.node(&event)?;
        }
        summary.unreadable = traversal.take_diagnostics().len();
        renderer.end_tree()?;
        summaries.push(summary);
    }
    renderer.finish()?;
    Ok(summaries)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, IncludeTreeError> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(fs::File::create(p)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

fn make_renderer(format: OutputFormat, out: Box<dyn Write>, separator: bool) -> Box<dyn TreeRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::new(out, separator)),
        OutputFormat::Json => Box::new(JsonRenderer::new(out)),
        OutputFormat::Dot => Box::new(DotRenderer::new(out)),
    }
}

fn summary_table(summaries: &[TreeSummary]) -> String {
    use table::Align::{Left, Right};
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            vec![
                s.entry.clone(),
                s.nodes.to_string(),
                s.external.to_string(),
                s.missing.to_string(),
                s.circular.to_string(),
                s.unreadable.to_string(),
            ]
        })
        .collect();
    table::render(
        &["Entry point", "Nodes", "Ext", "Missing", "Circular", "Unreadable"],
        &[Left, Right, Right, Right, Right, Right],
        &rows,
    )
}
