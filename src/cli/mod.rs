use crate::utils::config::OutputFormat;
use crate::utils::logging::Verbosity;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "include-tree",
    version,
    about = "Print the include tree of every C/C++ entry point in a directory",
    long_about = "Prints the include tree for every source file in DIR containing a main() function.\n\nAppends status for special cases:\n  (Ext) - external include\n  (C)   - circular dependency\n  (!)   - file not found"
)]
pub struct Cli {
    /// Only print errors on stderr
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
    /// Log resolution details on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print one include tree per entry point found under DIR
    Scan(ScanArgs),
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Directory to scan; also the fallback location for "..." includes
    pub dir: PathBuf,
    /// Path to a TOML configuration file (default: DIR/include-tree.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Include files even if matched by .gitignore/.ignore
    #[arg(long, default_value_t = false)]
    pub no_ignore: bool,
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Write the trees to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Implementation file extensions, in companion search order (e.g. .cpp,.cc,.c)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,
    /// Text that marks a file as a program entry point
    #[arg(long)]
    pub entry_marker: Option<String>,
    /// Do not print the ':' separator line before each text tree
    #[arg(long, default_value_t = false)]
    pub no_separator: bool,
    /// Print per-entry-point counts to stderr after the trees
    #[arg(long, default_value_t = false)]
    pub summary: bool,
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scan_with_extensions_list() {
        let cli = Cli::parse_from(["include-tree", "-v", "scan", "proj", "--extensions", ".cc,.c", "--format", "json"]);
        assert_eq!(cli.verbosity(), Verbosity::Verbose);
        let Commands::Scan(args) = cli.command else { panic!("expected scan") };
        assert_eq!(args.dir, PathBuf::from("proj"));
        assert_eq!(args.extensions, Some(vec![".cc".to_string(), ".c".to_string()]));
        assert_eq!(args.format, Some(OutputFormat::Json));
        assert!(!args.summary);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["include-tree", "-q", "-v", "scan", "."]).is_err());
    }

    #[test]
    fn scan_requires_directory() {
        assert!(Cli::try_parse_from(["include-tree", "scan"]).is_err());
    }
}
