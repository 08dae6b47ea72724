use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use include_tree::graph::resolver::ArtifactResolver;
use include_tree::graph::traversal::IncludeTree;
use include_tree::graph::DependencyCache;
use std::fs;
use std::path::{Path, PathBuf};

/// Layered headers: each header in layer `l` includes every header of layer `l + 1`.
fn synthetic_project(root: &Path, layers: usize, width: usize) -> PathBuf {
    fs::create_dir_all(root).expect("create project dir");
    for l in 0..layers {
        for w in 0..width {
            let mut body = String::from("#include <cstddef>\n");
            if l + 1 < layers {
                for next in 0..width {
                    body.push_str(&format!("#include \"h{}_{next}.h\"\n", l + 1));
                }
            }
            fs::write(root.join(format!("h{l}_{w}.h")), body).expect("write header");
        }
    }
    let mut main = String::new();
    for w in 0..width {
        main.push_str(&format!("#include \"h0_{w}.h\"\n"));
    }
    main.push_str("int main() { return 0; }\n");
    let entry = root.join("main.cpp");
    fs::write(&entry, main).expect("write entry");
    entry
}

fn bench_traverse(c: &mut Criterion) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = td.path().join("proj");
    let entry = synthetic_project(&root, 4, 4);
    let tree = IncludeTree::new(ArtifactResolver::with_working_dir(&root, td.path()));

    let mut group = c.benchmark_group("traverse");

    group.bench_function(BenchmarkId::new("full_walk", "cold_cache"), |b| {
        b.iter(|| {
            let mut cache = DependencyCache::new();
            let n = tree.traverse(&mut cache, black_box(&entry)).count();
            black_box(n)
        })
    });

    // Replays only: every record is already cached
    let mut warm = DependencyCache::new();
    let _ = tree.traverse(&mut warm, &entry).count();
    group.bench_function(BenchmarkId::new("full_walk", "warm_cache"), |b| {
        b.iter(|| {
            let n = tree.traverse(&mut warm, black_box(&entry)).count();
            black_box(n)
        })
    });

    group.finish();
}

criterion_group!(name = benches; config = Criterion::default(); targets = bench_traverse);
criterion_main!(benches);
