//! `wsgen` binary.

fn main() {
    wsgen_cli::init_tracing();
    let code = wsgen_cli::run_cli(std::env::args().collect());
    std::process::exit(code);
}
