//! Pipeline Benchmarks
//!
//! Run with: cargo bench --bench pipeline

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use plugin_market::plugins::{build_index, scan_plugins, validate_manifest, ValidationProfile};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_tree(root: &Path, count: usize) {
    for i in 0..count {
        let id = format!("plugin-{:04}", i);
        let dir = root.join(&id);
        fs::create_dir_all(dir.join("assets")).unwrap();
        fs::write(dir.join("assets/widget.js"), "export default {}").unwrap();
        fs::write(dir.join("README.md"), "# Plugin").unwrap();
        let manifest = json!({
            "id": id,
            "name": format!("Plugin {}", count - i),
            "version": "1.0.0",
            "author": "Bench",
            "description": "Synthetic plugin used for benchmarking",
            "category": "utilities",
            "hooks": ["navbar", "user_connect"],
            "frontend_scripts": ["widget.js"],
            "tags": ["bench", "synthetic"]
        });
        fs::write(dir.join("plugin.json"), manifest.to_string()).unwrap();
    }
}

fn benchmark_validate_manifest(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    write_tree(tmp.path(), 1);
    let dir = tmp.path().join("plugin-0000");
    let raw = plugin_market::plugins::read_manifest(&dir).unwrap();

    c.bench_function("validate_manifest", |b| {
        b.iter(|| {
            validate_manifest(
                black_box(&raw),
                "plugin-0000",
                &dir,
                ValidationProfile::default(),
            )
        });
    });
}

fn benchmark_scan_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_and_build");

    for count in [10, 100, 500].iter() {
        let tmp = TempDir::new().unwrap();
        write_tree(tmp.path(), *count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(format!("{}_plugins", count), count, |b, _| {
            b.iter(|| {
                let outcomes =
                    scan_plugins(tmp.path(), ValidationProfile::default(), &[]).unwrap();
                build_index(&outcomes, chrono::Utc::now()).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_validate_manifest,
    benchmark_scan_and_build
);
criterion_main!(benches);
