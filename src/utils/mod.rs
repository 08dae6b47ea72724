pub mod table {
    //! Plain ASCII tables for the scan summary.

    /// Column alignment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Align {
        Left,
        Right,
    }

    fn rule(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    fn row(cells: &[&str], widths: &[usize], aligns: &[Align]) -> String {
        let mut s = String::from("|");
        for (i, w) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or("");
            let pad = w.saturating_sub(cell.chars().count());
            let align = aligns.get(i).copied().unwrap_or(Align::Left);
            s.push(' ');
            if align == Align::Right {
                s.push_str(&" ".repeat(pad));
            }
            s.push_str(cell);
            if align == Align::Left {
                s.push_str(&" ".repeat(pad));
            }
            s.push_str(" |");
        }
        s
    }

    /// Render `rows` under `headers`; missing cells render empty.
    #[must_use]
    pub fn render(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for r in rows {
            for (w, cell) in widths.iter_mut().zip(r) {
                *w = (*w).max(cell.chars().count());
            }
        }
        let sep = rule(&widths);
        let mut lines = vec![sep.clone(), row(headers, &widths, &[]), sep.clone()];
        for r in rows {
            let cells: Vec<&str> = r.iter().map(String::as_str).collect();
            lines.push(row(&cells, &widths, aligns));
        }
        lines.push(sep);
        lines.join("\n")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn renders_aligned_columns() {
            let out = render(
                &["Entry", "Nodes"],
                &[Align::Left, Align::Right],
                &[vec!["main.cpp".into(), "7".into()], vec!["t.c".into(), "12".into()]],
            );
            let lines: Vec<&str> = out.lines().collect();
            assert_eq!(lines[0], "+----------+-------+");
            assert_eq!(lines[1], "| Entry    | Nodes |");
            assert_eq!(lines[3], "| main.cpp |     7 |");
            assert_eq!(lines[4], "| t.c      |    12 |");
            assert_eq!(lines.len(), 6);
        }
    }
}

pub mod config {
    //! `include-tree.toml` loading.
    use crate::errors::IncludeTreeError;
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const CONFIG_FILE_NAME: &str = "include-tree.toml";

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct ResolveConfig {
        /// Implementation extensions in companion search order.
        pub extensions: Option<Vec<String>>,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct OutputConfig {
        pub format: Option<OutputFormat>,
        pub separator: Option<bool>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
    #[serde(rename_all = "lowercase")]
    pub enum OutputFormat {
        Text,
        Json,
        Dot,
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    #[serde(deny_unknown_fields)]
    pub struct Config {
        /// Substring marking a file as a program entry point.
        pub entry_marker: Option<String>,
        pub resolve: Option<ResolveConfig>,
        pub output: Option<OutputConfig>,
    }

    fn default_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Load and parse a config file.
    ///
    /// # Errors
    /// Returns `IncludeTreeError::Io` if the file cannot be read and
    /// `IncludeTreeError::Config` if it is not valid TOML for `Config`.
    pub fn load_config_at(path: &Path) -> Result<Config, IncludeTreeError> {
        let data = fs::read_to_string(path)?;
        toml::from_str::<Config>(&data)
            .map_err(|e| IncludeTreeError::Config { file: path.to_path_buf(), message: e.to_string() })
    }

    /// Load `include-tree.toml` from `root` when present.
    ///
    /// # Errors
    /// Same as [`load_config_at`] for an existing file.
    pub fn load_config_near(root: &Path) -> Result<Option<Config>, IncludeTreeError> {
        let path = default_config_path(root);
        if path.is_file() {
            load_config_at(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

pub mod file_walker {
    //! Candidate discovery for the entry-point driver.
    use crate::graph::resolver::ArtifactResolver;
    use rayon::prelude::*;
    use std::path::{Path, PathBuf};

    /// Implementation files under `root`, sorted by path.
    ///
    /// `.gitignore`/`.ignore` rules apply unless `no_ignore`; global git
    /// excludes never do, so results only depend on the scanned tree.
    #[must_use]
    pub fn source_files(root: &Path, no_ignore: bool, resolver: &ArtifactResolver) -> Vec<PathBuf> {
        let mut walker = ignore::WalkBuilder::new(root);
        walker
            .follow_links(false)
            .git_ignore(!no_ignore)
            .git_global(false)
            .git_exclude(false)
            .ignore(!no_ignore)
            .require_git(false)
            .parents(!no_ignore)
            .sort_by_file_name(|a, b| a.cmp(b));
        let mut out = Vec::new();
        for entry in walker.build() {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("skipping unreadable directory entry: {e}");
                    continue;
                }
            };
            if entry.file_type().is_some_and(|t| t.is_file()) && resolver.is_implementation(entry.path()) {
                out.push(entry.into_path());
            }
        }
        out
    }

    /// Files from `candidates` containing `marker`, in input order.
    #[must_use]
    pub fn entry_points(candidates: &[PathBuf], marker: &str) -> Vec<PathBuf> {
        candidates
            .par_iter()
            .filter(|p| crate::parser::contains_entry_marker(p, marker))
            .cloned()
            .collect()
    }
}

pub mod logging {
    //! `tracing` subscriber setup for the binary.
    use std::sync::Once;
    use tracing_subscriber::EnvFilter;

    static INIT: Once = Once::new();

    /// Environment variable consulted before `RUST_LOG`.
    pub const LOG_ENV: &str = "INCLUDE_TREE_LOG";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Verbosity {
        Quiet,
        Normal,
        Verbose,
    }

    impl Verbosity {
        #[must_use]
        pub fn default_directive(self) -> &'static str {
            match self {
                Verbosity::Quiet => "error",
                Verbosity::Normal => "warn",
                Verbosity::Verbose => "debug",
            }
        }
    }

    /// Install the stderr subscriber once; later calls are no-ops.
    pub fn init_logging(verbosity: Verbosity) {
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new(verbosity.default_directive()));
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .try_init();
        });
    }
}
