// Stamps the build target and profile into `sbem version --extended`.
fn main() {
    for (source, stamp) in [("TARGET", "SBEM_BUILD_TARGET"), ("PROFILE", "SBEM_BUILD_PROFILE")] {
        let value = std::env::var(source).unwrap_or_else(|_| "unknown".into());
        println!("cargo:rustc-env={stamp}={value}");
        println!("cargo:rerun-if-env-changed={source}");
    }
}
