fn main() {
    let cli = include_tree::cli::parse();
    let code = include_tree::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
