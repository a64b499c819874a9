use std::hint::black_box;
use std::time::Instant;

use branchstore_kernel::{FileRegistry, RollbackTarget};

fn make_registry(file_count: usize, edits_per_file: usize) -> FileRegistry {
    let mut reg = FileRegistry::new();
    for i in 0..file_count {
        let name = format!("file{i}");
        reg.create(&name).expect("fresh name");
        for e in 0..edits_per_file {
            reg.insert(&name, "x").expect("registered");
            if e % 2 == 0 {
                reg.snapshot(&name, "checkpoint").expect("registered");
            }
        }
    }
    reg
}

fn bench_mutation(file_count: usize, iterations: usize) {
    let mut reg = make_registry(file_count, 4);

    let start = Instant::now();
    for i in 0..iterations {
        let name = format!("file{}", i % file_count);
        let _ = black_box(reg.insert(black_box(&name), black_box("y")));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  insert + rebuild ({file_count} files, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_ranking(file_count: usize, limit: Option<usize>, iterations: usize) {
    let reg = make_registry(file_count, 4);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(reg.rank_by_recency(black_box(limit)));
        let _ = black_box(reg.rank_by_version_count(black_box(limit)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  rank ({file_count} files, limit={limit:?}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_deep_history(depth: usize, iterations: usize) {
    let mut reg = FileRegistry::new();
    reg.create("deep").expect("fresh name");
    for _ in 0..depth {
        reg.insert("deep", "x").expect("registered");
        reg.snapshot("deep", "s").expect("registered");
    }

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(reg.history(black_box("deep")));
        let _ = black_box(reg.rollback("deep", RollbackTarget::Parent));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  history + rollback (depth {depth}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Registry Benchmarks ===\n");

    println!("Mutation with full index rebuild:");
    bench_mutation(10, 10000);
    bench_mutation(100, 1000);
    bench_mutation(1000, 100);

    println!("\nRanking queries:");
    bench_ranking(1000, Some(10), 1000);
    bench_ranking(1000, None, 100);

    println!("\nHistory traversal:");
    bench_deep_history(1000, 500);

    println!("\n=== Done ===");
}
