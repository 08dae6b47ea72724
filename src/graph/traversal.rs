//! Depth-first include traversal.
//!
//! [`Traversal`] is an iterator of [`TreeEvent`]s in pre-order. Instead of
//! recursing it keeps an explicit frame stack, so events are produced one at a
//! time and the caller may render while the walk is still in progress.
//!
//! Each frame carries its own ancestor chain (a shared, immutable linked list
//! of [`PathId`]s). A child is circular only if it appears on that chain, so
//! siblings and earlier entry points never affect each other's cycle checks.
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use super::resolver::{ArtifactResolver, Resolution};
use super::{Classification, DependencyCache, DependencyRecord, NodeStatus, PathId, TreeEvent};
use crate::errors::ExtractError;
use crate::parser::{Directive, IncludeParser};

/// A file that was found but whose includes could not be read.
#[derive(Debug)]
pub struct Diagnostic {
    pub path: Arc<str>,
    pub error: ExtractError,
}

/// Resolver and parser shared by every traversal of a run.
#[derive(Debug)]
pub struct IncludeTree {
    resolver: ArtifactResolver,
    parser: IncludeParser,
}

impl IncludeTree {
    #[must_use]
    pub fn new(resolver: ArtifactResolver) -> Self {
        Self { resolver, parser: IncludeParser::new() }
    }

    #[must_use]
    pub fn resolver(&self) -> &ArtifactResolver {
        &self.resolver
    }

    /// Start a walk at `start`, memoizing into `cache`.
    pub fn traverse<'a>(&'a self, cache: &'a mut DependencyCache, start: &Path) -> Traversal<'a> {
        Traversal::new(cache, &self.resolver, &self.parser, start)
    }
}

#[derive(Debug, Clone, Default)]
struct Ancestors(Option<Rc<AncestorLink>>);

#[derive(Debug)]
struct AncestorLink {
    id: PathId,
    parent: Ancestors,
}

impl Ancestors {
    fn contains(&self, id: PathId) -> bool {
        let mut cur = self.0.as_deref();
        while let Some(link) = cur {
            if link.id == id {
                return true;
            }
            cur = link.parent.0.as_deref();
        }
        false
    }

    fn with(&self, id: PathId) -> Self {
        Ancestors(Some(Rc::new(AncestorLink { id, parent: self.clone() })))
    }
}

#[derive(Debug)]
struct Visit {
    id: PathId,
    depth: usize,
    ancestors: Ancestors,
}

#[derive(Debug)]
enum Work {
    /// Children known from the cache.
    Replay { children: Arc<[PathId]>, next: usize },
    /// First expansion: directives still to resolve, local children waiting
    /// to be visited, and every child discovered so far.
    Expand { directives: std::vec::IntoIter<Directive>, queued: VecDeque<PathId>, children: Vec<PathId> },
}

#[derive(Debug)]
struct Frame {
    id: PathId,
    depth: usize,
    // Ancestors of this frame's children; includes `id`.
    ancestors: Ancestors,
    work: Work,
}

enum Step {
    Emit(TreeEvent),
    Visit(Visit),
    /// Local children were queued; pick them up on the next step.
    Continue,
    Finish,
}

/// Lazy pre-order walk over one entry point's include tree.
///
/// Drain the iterator to completion: a file's record is stored in the cache
/// only once all of its children have been emitted.
#[derive(Debug)]
pub struct Traversal<'a> {
    cache: &'a mut DependencyCache,
    resolver: &'a ArtifactResolver,
    parser: &'a IncludeParser,
    stack: Vec<Frame>,
    pending: Option<Visit>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Traversal<'a> {
    pub fn new(
        cache: &'a mut DependencyCache,
        resolver: &'a ArtifactResolver,
        parser: &'a IncludeParser,
        start: &Path,
    ) -> Self {
        let id = cache.intern(&resolver.canonical_label(start));
        Self {
            cache,
            resolver,
            parser,
            stack: Vec::new(),
            pending: Some(Visit { id, depth: 0, ancestors: Ancestors::default() }),
            diagnostics: Vec::new(),
        }
    }

    /// Read failures met so far, one per file.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn event(&self, id: PathId, depth: usize, status: NodeStatus) -> TreeEvent {
        TreeEvent { depth, label: self.cache.label(id).clone(), status }
    }

    fn visit(&mut self, visit: Visit) -> TreeEvent {
        let Visit { id, depth, ancestors } = visit;

        if ancestors.contains(id) {
            tracing::debug!(path = %self.cache.label(id), "circular include");
            return self.event(id, depth, NodeStatus::Circular);
        }

        if let Some(record) = self.cache.lookup(id) {
            let classification = record.classification;
            let children = record.children.clone();
            self.cache.stats_mut().hits += 1;
            if classification == Classification::Normal && !children.is_empty() {
                self.stack.push(Frame {
                    id,
                    depth,
                    ancestors: ancestors.with(id),
                    work: Work::Replay { children, next: 0 },
                });
            }
            return self.event(id, depth, classification.into());
        }

        self.cache.stats_mut().misses += 1;
        let label = self.cache.label(id).clone();
        let directives = match self.parser.extract_file(&self.resolver.locate(&label)) {
            Ok(directives) => directives,
            Err(error) => {
                tracing::warn!("{error}");
                self.diagnostics.push(Diagnostic { path: label.clone(), error });
                Vec::new()
            }
        };
        self.cache.stats_mut().files_read += 1;
        tracing::debug!(path = %label, includes = directives.len(), "expanding");
        self.stack.push(Frame {
            id,
            depth,
            ancestors: ancestors.with(id),
            work: Work::Expand {
                directives: directives.into_iter(),
                queued: VecDeque::new(),
                children: Vec::new(),
            },
        });
        self.event(id, depth, NodeStatus::Normal)
    }

    fn step(&mut self) -> Option<Step> {
        let frame = self.stack.last_mut()?;
        let child_depth = frame.depth + 1;
        let step = match &mut frame.work {
            Work::Replay { children, next } => match children.get(*next) {
                Some(&child) => {
                    *next += 1;
                    Step::Visit(Visit { id: child, depth: child_depth, ancestors: frame.ancestors.clone() })
                }
                None => Step::Finish,
            },
            Work::Expand { directives, queued, children } => {
                if let Some(child) = queued.pop_front() {
                    Step::Visit(Visit { id: child, depth: child_depth, ancestors: frame.ancestors.clone() })
                } else if let Some(directive) = directives.next() {
                    let including = self.cache.label(frame.id).clone();
                    match self.resolver.resolve(&directive, &including) {
                        Resolution::External(name) => {
                            let id = self.cache.intern_external(&name);
                            self.cache.insert_if_absent(id, DependencyRecord::leaf(Classification::External));
                            children.push(id);
                            let label = self.cache.label(id).clone();
                            Step::Emit(TreeEvent { depth: child_depth, label, status: NodeStatus::External })
                        }
                        Resolution::Missing(name) => {
                            tracing::debug!(include = %name, from = %including, "include not found");
                            let id = self.cache.intern(&name);
                            self.cache.insert_if_absent(id, DependencyRecord::leaf(Classification::Missing));
                            children.push(id);
                            let label = self.cache.label(id).clone();
                            Step::Emit(TreeEvent { depth: child_depth, label, status: NodeStatus::Missing })
                        }
                        Resolution::Local(path) => {
                            if let Some(companion) = self.resolver.companion(&path, &including) {
                                let cid = self.cache.intern(&companion);
                                children.push(cid);
                                queued.push_back(cid);
                            }
                            let id = self.cache.intern(&path);
                            children.push(id);
                            queued.push_back(id);
                            Step::Continue
                        }
                    }
                } else {
                    Step::Finish
                }
            }
        };
        Some(step)
    }

    fn finish_frame(&mut self) {
        if let Some(frame) = self.stack.pop() {
            if let Work::Expand { children, .. } = frame.work {
                self.cache.insert_if_absent(frame.id, DependencyRecord::normal(children));
            }
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = TreeEvent;

    fn next(&mut self) -> Option<TreeEvent> {
        loop {
            if let Some(visit) = self.pending.take() {
                return Some(self.visit(visit));
            }
            match self.step()? {
                Step::Emit(event) => return Some(event),
                Step::Visit(visit) => self.pending = Some(visit),
                Step::Continue => {}
                Step::Finish => self.finish_frame(),
            }
        }
    }
}
