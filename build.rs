// build.rs
fn main() {
    // Generate build info (VERGEN_BUILD_TIMESTAMP)
    vergen::EmitBuilder::builder()
        .build_timestamp()
        .emit()
        .expect("Unable to generate build info");
}
