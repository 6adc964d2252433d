fn main() {
    println!("cargo:rerun-if-env-changed=TOXCORE_LIB_DIR");
    println!("cargo:rerun-if-env-changed=TOXCORE_LIB_NAME");

    // Only emit link flags when the toxcore feature is enabled, so default
    // builds and tests never need the native library installed.
    if std::env::var("CARGO_FEATURE_TOXCORE").is_ok() {
        if let Ok(dir) = std::env::var("TOXCORE_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", dir);
        }
        let lib_name = std::env::var("TOXCORE_LIB_NAME").unwrap_or_else(|_| "toxcore".to_string());
        println!("cargo:rustc-link-lib={}", lib_name);
    }
}
