//! Renderers for include-tree event streams.
//!
//! A renderer receives one `begin_tree` per entry point, the tree's events in
//! pre-order, then `end_tree`; `finish` is called once after the last tree.
use crate::graph::{NodeStatus, TreeEvent};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::sync::Arc;

/// Width of the separator line printed before each text tree.
pub const SEPARATOR_WIDTH: usize = 80;

pub trait TreeRenderer {
    /// Start the tree of entry point `entry`.
    ///
    /// # Errors
    /// Propagates write failures.
    fn begin_tree(&mut self, entry: &str) -> io::Result<()>;

    /// # Errors
    /// Propagates write failures.
    fn node(&mut self, event: &TreeEvent) -> io::Result<()>;

    /// # Errors
    /// Propagates write failures.
    fn end_tree(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// # Errors
    /// Propagates write failures.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `depth * 2` spaces, the label, then the status suffix if any.
#[must_use]
pub fn format_line(event: &TreeEvent) -> String {
    let mut line = " ".repeat(event.depth * 2);
    line.push_str(&event.label);
    if let Some(suffix) = event.status.suffix() {
        line.push(' ');
        line.push_str(suffix);
    }
    line
}

/// Indented plain-text output, streamed as events arrive.
pub struct TextRenderer<W: Write> {
    out: W,
    separator: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, separator: bool) -> Self {
        Self { out, separator }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TreeRenderer for TextRenderer<W> {
    fn begin_tree(&mut self, _entry: &str) -> io::Result<()> {
        if self.separator {
            writeln!(self.out, "{}", ":".repeat(SEPARATOR_WIDTH))?;
        }
        Ok(())
    }

    fn node(&mut self, event: &TreeEvent) -> io::Result<()> {
        writeln!(self.out, "{}", format_line(event))
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Nested form of one tree, rebuilt from the event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub label: Arc<str>,
    pub status: NodeStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl From<&TreeEvent> for TreeNode {
    fn from(event: &TreeEvent) -> Self {
        Self { label: event.label.clone(), status: event.status, children: Vec::new() }
    }
}

/// Folds pre-order events back into nested nodes using their depths.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    open: Vec<TreeNode>,
    roots: Vec<TreeNode>,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: &TreeEvent) {
        self.close_to(event.depth);
        self.open.push(TreeNode::from(event));
    }

    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth {
            let Some(node) = self.open.pop() else { break };
            match self.open.last_mut() {
                Some(parent) => parent.children.push(node),
                None => self.roots.push(node),
            }
        }
    }

    #[must_use]
    pub fn finish(mut self) -> Vec<TreeNode> {
        self.close_to(0);
        self.roots
    }
}

#[derive(Debug, Serialize)]
struct EntryTree {
    entry: String,
    tree: Option<TreeNode>,
}

/// JSON array of `{ entry, tree }`, written on `finish`.
pub struct JsonRenderer<W: Write> {
    out: W,
    trees: Vec<EntryTree>,
    current: Option<(String, TreeBuilder)>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, trees: Vec::new(), current: None }
    }
}

impl<W: Write> TreeRenderer for JsonRenderer<W> {
    fn begin_tree(&mut self, entry: &str) -> io::Result<()> {
        self.end_tree()?;
        self.current = Some((entry.to_string(), TreeBuilder::new()));
        Ok(())
    }

    fn node(&mut self, event: &TreeEvent) -> io::Result<()> {
        if let Some((_, builder)) = self.current.as_mut() {
            builder.push(event);
        }
        Ok(())
    }

    fn end_tree(&mut self) -> io::Result<()> {
        if let Some((entry, builder)) = self.current.take() {
            let tree = builder.finish().into_iter().next();
            self.trees.push(EntryTree { entry, tree });
        }
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.end_tree()?;
        let data = serde_json::to_string_pretty(&self.trees).map_err(io::Error::other)?;
        writeln!(self.out, "{data}")?;
        self.out.flush()
    }
}

/// Graphviz digraph with one cluster per entry point and one node per event.
pub struct DotRenderer<W: Write> {
    out: W,
    body: String,
    clusters: usize,
    nodes: usize,
    parents: Vec<String>,
}

impl<W: Write> DotRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, body: String::new(), clusters: 0, nodes: 0, parents: Vec::new() }
    }
}

impl<W: Write> TreeRenderer for DotRenderer<W> {
    fn begin_tree(&mut self, entry: &str) -> io::Result<()> {
        self.parents.clear();
        let _ = write!(
            self.body,
            "  subgraph \"cluster_{}\" {{\n    label=\"{}\";\n    color=lightgrey;\n",
            self.clusters,
            escape_label(entry)
        );
        self.clusters += 1;
        Ok(())
    }

    fn node(&mut self, event: &TreeEvent) -> io::Result<()> {
        let id = format!("n{}", self.nodes);
        self.nodes += 1;
        let (fill, style) = style_for_status(event.status);
        let _ = writeln!(
            self.body,
            "    \"{id}\" [label=\"{}\", fillcolor=\"{fill}\", style=\"{style}\"];",
            escape_label(&event.label)
        );
        self.parents.truncate(event.depth);
        if let Some(parent) = self.parents.last() {
            let _ = writeln!(self.body, "    \"{parent}\" -> \"{id}\";");
        }
        self.parents.push(id);
        Ok(())
    }

    fn end_tree(&mut self) -> io::Result<()> {
        self.body.push_str("  }\n");
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        write!(
            self.out,
            "digraph IncludeTree\n{{\n  rankdir=LR;\n  graph [fontname=Helvetica];\n  node [shape=box, fontsize=10];\n{}}}\n",
            self.body
        )?;
        self.out.flush()
    }
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn style_for_status(status: NodeStatus) -> (&'static str, &'static str) {
    match status {
        NodeStatus::Normal => ("#e0f3ff", "filled,rounded"),
        NodeStatus::External => ("#f0f0f0", "filled,dashed"),
        NodeStatus::Missing => ("#ffd6d6", "filled,bold"),
        NodeStatus::Circular => ("#fff4e0", "filled,dotted"),
    }
}
