fn main() {
    guidia::app::cli::run();
}
