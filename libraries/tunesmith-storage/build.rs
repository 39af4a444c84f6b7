//! Build script for tunesmith-storage.

fn main() {
    // Embedded migrations are read at compile time
    println!("cargo:rerun-if-changed=migrations");
}
