use std::process;

fn main() {
    match opdoc_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("opdoc error: {err:#}");
            process::exit(1);
        }
    }
}
