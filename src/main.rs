fn main() {
    if let Err(err) = loan_allocator::cli::run() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
