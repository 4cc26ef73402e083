fn main() {
    if let Err(err) = built::write_built_file() {
        println!("cargo:warning=failed to write build metadata: {err}");
    }
}
