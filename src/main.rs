fn main() {
    if let Err(err) = sql_type_advisor::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
