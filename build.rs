use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

fn main() {
    prepare_public_assets().expect("failed to prepare static public assets");

    let static_dir = Path::new("static");
    println!("cargo:rerun-if-changed={}", static_dir.display());
    println!("cargo:rerun-if-changed=templates");

    if static_dir.is_dir() {
        for entry in WalkDir::new(static_dir).into_iter().flatten() {
            println!("cargo:rerun-if-changed={}", entry.path().display());
        }
    }
}

fn prepare_public_assets() -> Result<(), String> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").map_err(|err| err.to_string())?);
    let source_public = Path::new("static").join("public");
    let dest_public = out_dir.join("static_public");

    if dest_public.exists() {
        fs::remove_dir_all(&dest_public)
            .map_err(|err| format!("failed to clean {}: {err}", dest_public.display()))?;
    }

    copy_dir(&source_public, &dest_public)?;

    // Only the concatenated site.css is shipped; drop the split sources.
    let split_dir = dest_public.join("styles");
    if split_dir.exists() {
        fs::remove_dir_all(&split_dir)
            .map_err(|err| format!("failed to clean split dir {}: {err}", split_dir.display()))?;
    }

    let parts_dir = source_public.join("styles");
    let mut parts: Vec<_> = fs::read_dir(&parts_dir)
        .map_err(|err| format!("failed to read {}: {err}", parts_dir.display()))?
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().map(|ft| ft.is_file()).unwrap_or(false) => Some(e),
            _ => None,
        })
        .collect();

    parts.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if parts.is_empty() {
        return Err(format!("no css parts found in {}", parts_dir.display()));
    }

    let mut combined = String::new();
    for entry in parts {
        let content = fs::read_to_string(entry.path())
            .map_err(|err| format!("failed to read {}: {err}", entry.path().display()))?;
        combined.push_str(content.trim_end());
        combined.push_str("\n\n");
    }

    let dest_file = dest_public.join("site.css");
    fs::write(&dest_file, combined)
        .map_err(|err| format!("failed to write {}: {err}", dest_file.display()))?;

    Ok(())
}

fn copy_dir(source: &Path, destination: &Path) -> Result<(), String> {
    fs::create_dir_all(destination)
        .map_err(|err| format!("failed to create {}: {err}", destination.display()))?;

    for entry in WalkDir::new(source).into_iter().flatten() {
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|err| format!("failed to strip prefix: {err}"))?;
        let target_path = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path)
                .map_err(|err| format!("failed to create {}: {err}", target_path.display()))?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target_path.parent() {
                fs::create_dir_all(parent)
                    .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
            }
            fs::copy(entry.path(), &target_path)
                .map_err(|err| format!("failed to copy {}: {err}", target_path.display()))?;
        }
    }

    Ok(())
}
