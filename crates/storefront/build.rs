//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet and the customizer script so templates can
//! reference content-addressed copies that are safe to cache forever.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Static assets to fingerprint: (path under `static/`, env var, extension).
const ASSETS: [(&str, &str, &str); 2] = [
    ("css/main.css", "CSS_HASH", "css"),
    ("js/customize.js", "JS_HASH", "js"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let static_dir = Path::new(&manifest_dir).join("static");

    for (relative, var, ext) in ASSETS {
        fingerprint(&static_dir, relative, var, ext);
    }
}

/// Hash one asset and copy it to `static/derived/` with the hash in its name.
///
/// Sets `var` to the short hash, or to an empty string when the asset is
/// missing so templates fall back to the plain path.
fn fingerprint(static_dir: &Path, relative: &str, var: &str, ext: &str) {
    let source = static_dir.join(relative);
    println!("cargo:rerun-if-changed={}", source.display());

    let content = match fs::read(&source) {
        Ok(content) => content,
        Err(e) => {
            println!("cargo:warning=Could not read {relative}: {e}");
            println!("cargo:rustc-env={var}=");
            return;
        }
    };

    let hash = format!("{:x}", Sha256::digest(&content));
    let short_hash = &hash[..8];
    println!("cargo:rustc-env={var}={short_hash}");

    let stem = Path::new(relative)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("asset");
    let derived_dir = static_dir.join("derived");
    fs::create_dir_all(&derived_dir).expect("Failed to create derived asset directory");
    fs::copy(&source, derived_dir.join(format!("{stem}.{short_hash}.{ext}")))
        .expect("Failed to copy asset to derived directory");
}
