fn main() {
    deplink::cli::run();
}
