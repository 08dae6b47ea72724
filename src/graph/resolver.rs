use std::path::{Component, Path, PathBuf};

use crate::parser::Directive;

/// Implementation-file extensions in companion search order.
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".cpp", ".cxx", ".cc", ".c"];

/// Outcome of resolving one include directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// `<...>` include, left to the toolchain's search path.
    External(String),
    /// `"..."` include found in neither search location; carries the root-relative label.
    Missing(String),
    /// Canonical label of the file the include refers to.
    Local(String),
}

/// Turns include names into canonical labels.
///
/// A label is the lexically normalized path relative to the working
/// directory; paths outside the working directory keep their absolute form.
/// Resolution only looks at the filesystem and at its inputs, never at
/// traversal state, so its results can be cached for the whole run.
#[derive(Debug, Clone)]
pub struct ArtifactResolver {
    root: PathBuf,
    working_dir: PathBuf,
    extensions: Vec<String>,
}

impl ArtifactResolver {
    /// Resolver for `root` relative to the process working directory.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_working_dir(root, &working_dir)
    }

    #[must_use]
    pub fn with_working_dir(root: &Path, working_dir: &Path) -> Self {
        let working_dir = normalize(working_dir);
        let root = normalize(&working_dir.join(root));
        Self { root, working_dir, extensions: normalize_extensions(DEFAULT_EXTENSIONS) }
    }

    /// Replace the implementation extension list; order is the companion search order.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = normalize_extensions(extensions);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Filesystem location of a canonical label.
    #[must_use]
    pub fn locate(&self, label: &str) -> PathBuf {
        self.working_dir.join(label)
    }

    /// Canonical label for any path, relative paths taken from the working directory.
    #[must_use]
    pub fn canonical_label(&self, path: &Path) -> String {
        let abs = normalize(&self.working_dir.join(path));
        match abs.strip_prefix(&self.working_dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
            _ => abs.to_string_lossy().into_owned(),
        }
    }

    /// Resolve `directive` as seen from the file labelled `including`.
    ///
    /// Local names are tried next to the including file, then under the root.
    #[must_use]
    pub fn resolve(&self, directive: &Directive, including: &str) -> Resolution {
        if directive.is_external {
            return Resolution::External(directive.name.clone());
        }
        let including_path = self.locate(including);
        let containing_dir = including_path.parent().unwrap_or(&self.working_dir);
        let beside = containing_dir.join(&directive.name);
        if beside.is_file() {
            return Resolution::Local(self.canonical_label(&beside));
        }
        let under_root = self.root.join(&directive.name);
        if under_root.is_file() {
            Resolution::Local(self.canonical_label(&under_root))
        } else {
            Resolution::Missing(self.canonical_label(&under_root))
        }
    }

    #[must_use]
    pub fn is_implementation(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|x| x == e))
    }

    /// Implementation file backing the header `header`, if one sits beside it.
    ///
    /// Returns `None` when `header` is itself an implementation file, or when it
    /// is the own header of `including` (an implementation file with the same
    /// base path). Only the first extension that exists is returned.
    #[must_use]
    pub fn companion(&self, header: &str, including: &str) -> Option<String> {
        let header_path = Path::new(header);
        if self.is_implementation(header_path) {
            return None;
        }
        let including_path = Path::new(including);
        if self.is_implementation(including_path)
            && header_path.with_extension("") == including_path.with_extension("")
        {
            return None;
        }
        let located = self.locate(header);
        self.extensions
            .iter()
            .map(|ext| located.with_extension(ext))
            .find(|candidate| candidate.is_file())
            .map(|candidate| self.canonical_label(&candidate))
    }
}

fn normalize_extensions<I, S>(extensions: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|e| e.as_ref().trim().trim_start_matches('.').to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

// Lexical normalization: drops `.` and folds `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn local(name: &str) -> Directive {
        Directive { name: name.to_string(), is_external: false }
    }

    #[test]
    fn external_needs_no_lookup() {
        let td = tempdir().unwrap();
        let r = ArtifactResolver::with_working_dir(Path::new("proj"), td.path());
        let d = Directive { name: "vector".into(), is_external: true };
        assert_eq!(r.resolve(&d, "proj/main.cpp"), Resolution::External("vector".into()));
    }

    #[test]
    fn local_prefers_including_dir_then_root() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("proj/sub")).unwrap();
        fs::write(td.path().join("proj/x.h"), "").unwrap();
        fs::write(td.path().join("proj/sub/y.h"), "").unwrap();
        fs::write(td.path().join("proj/y.h"), "").unwrap();
        let r = ArtifactResolver::with_working_dir(Path::new("proj"), td.path());

        // absent beside the includer, present under root
        assert_eq!(r.resolve(&local("x.h"), "proj/sub/a.cpp"), Resolution::Local("proj/x.h".into()));
        // present beside the includer wins over root
        assert_eq!(
            r.resolve(&local("y.h"), "proj/sub/a.cpp"),
            Resolution::Local("proj/sub/y.h".into())
        );
    }

    #[test]
    fn missing_uses_root_relative_label() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("proj/sub")).unwrap();
        let r = ArtifactResolver::with_working_dir(Path::new("proj"), td.path());
        assert_eq!(
            r.resolve(&local("missing.h"), "proj/sub/a.cpp"),
            Resolution::Missing("proj/missing.h".into())
        );
    }

    #[test]
    fn labels_are_normalized() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("proj/inc")).unwrap();
        fs::create_dir_all(td.path().join("proj/src")).unwrap();
        fs::write(td.path().join("proj/inc/z.h"), "").unwrap();
        let r = ArtifactResolver::with_working_dir(Path::new("./proj"), td.path());
        assert_eq!(r.root(), td.path().join("proj").as_path());
        assert_eq!(
            r.resolve(&local("../inc/z.h"), "proj/src/../src/m.cpp"),
            Resolution::Local("proj/inc/z.h".into())
        );
        // root fallback folds `..` too
        assert_eq!(
            r.resolve(&local("../gone.h"), "proj/src/m.cpp"),
            Resolution::Missing("gone.h".into())
        );
        assert_eq!(r.canonical_label(Path::new("./proj/./inc/z.h")), "proj/inc/z.h");
        assert_eq!(r.canonical_label(Path::new("/elsewhere/q.h")), "/elsewhere/q.h");
    }

    #[test]
    fn companion_first_extension_wins() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("p")).unwrap();
        for f in ["p/a.h", "p/a.cc", "p/a.c"] {
            fs::write(td.path().join(f), "").unwrap();
        }
        let r = ArtifactResolver::with_working_dir(Path::new("p"), td.path());
        assert_eq!(r.companion("p/a.h", "p/main.cpp"), Some("p/a.cc".into()));

        let r = r.with_extensions([".c", ".cc"]);
        assert_eq!(r.companion("p/a.h", "p/main.cpp"), Some("p/a.c".into()));
    }

    #[test]
    fn companion_skips_self_header_and_implementation_includes() {
        let td = tempdir().unwrap();
        fs::create_dir_all(td.path().join("p")).unwrap();
        for f in ["p/foo.h", "p/foo.cpp", "p/bar.cpp"] {
            fs::write(td.path().join(f), "").unwrap();
        }
        let r = ArtifactResolver::with_working_dir(Path::new("p"), td.path());
        // foo.cpp including its own header
        assert_eq!(r.companion("p/foo.h", "p/foo.cpp"), None);
        // a header including foo.h still surfaces the implementation
        assert_eq!(r.companion("p/foo.h", "p/foo.hpp"), Some("p/foo.cpp".into()));
        // including an implementation file directly has no companion
        assert_eq!(r.companion("p/bar.cpp", "p/main.cpp"), None);
        assert_eq!(r.companion("p/none.h", "p/main.cpp"), None);
    }

    #[test]
    fn implementation_detection_uses_configured_list() {
        let r = ArtifactResolver::with_working_dir(Path::new("."), Path::new("/w"))
            .with_extensions(["cpp", ".C"]);
        assert!(r.is_implementation(Path::new("a.cpp")));
        assert!(r.is_implementation(Path::new("a.C")));
        assert!(!r.is_implementation(Path::new("a.c")));
        assert!(!r.is_implementation(Path::new("a.h")));
        assert_eq!(r.extensions(), &["cpp".to_string(), "C".to_string()]);
    }
}
