fn main() {
    if let Err(error) = mandate_lib::run() {
        eprintln!("mandate: {}", error);
        std::process::exit(1);
    }
}
