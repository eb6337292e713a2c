fn main() {
    if let Err(err) = playground::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
