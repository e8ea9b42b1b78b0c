use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::{fs, fs::File, io::Write, num::NonZeroUsize, path::Path};
use tempfile::tempdir;
use treescout::{find, SearchConfig};

fn create_test_files(dir: &Path, file_count: usize, lines_per_file: usize) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    for i in 0..file_count {
        let file_path = dir.join(format!("test_{}.txt", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(
                file,
                "Line {} TODO: fix bug {} FIXME: optimize line {} NOTE: important task {}",
                j, j, j, j
            )?;
        }
    }
    Ok(())
}

fn create_tree(root: &Path, depth: usize, fan_out: usize, files_per_dir: usize) -> std::io::Result<()> {
    create_test_files(root, files_per_dir, 20)?;
    if depth == 0 {
        return Ok(());
    }
    for i in 0..fan_out {
        create_tree(&root.join(format!("dir_{}", i)), depth - 1, fan_out, files_per_dir)?;
    }
    Ok(())
}

fn create_base_config(threads: usize) -> SearchConfig {
    SearchConfig {
        allowed_extensions: [".txt".to_string()].into_iter().collect(),
        thread_count: NonZeroUsize::new(threads).unwrap(),
        ..SearchConfig::default()
    }
}

fn bench_match_modes(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(dir.path(), 10, 200).unwrap();

    let mut group = c.benchmark_group("Match Modes");
    for (match_case, match_full_word) in [(true, true), (false, true), (true, false), (false, false)] {
        let config = SearchConfig {
            match_case,
            match_full_word,
            ..create_base_config(4)
        };
        let id = format!("{:?}", config.match_mode());
        group.bench_function(id, |b| {
            b.iter(|| black_box(find(dir.path(), "todo", &config).unwrap()));
        });
    }
    group.bench_function("phrase", |b| {
        let config = SearchConfig {
            match_full_word: true,
            ..create_base_config(4)
        };
        b.iter(|| black_box(find(dir.path(), "optimize line", &config).unwrap()));
    });
    group.finish();
}

fn bench_file_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("File Scaling");
    for count in [1, 10, 100, 1000] {
        let dir = tempdir().unwrap();
        create_test_files(dir.path(), count, 10).unwrap();
        let config = create_base_config(4);

        group.bench_with_input(BenchmarkId::new("files", count), &count, |b, _| {
            b.iter(|| black_box(find(dir.path(), "TODO", &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_thread_scaling(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_tree(dir.path(), 3, 4, 5).unwrap();

    let mut group = c.benchmark_group("Thread Scaling");
    for threads in [1, 2, 4, 8] {
        let config = create_base_config(threads);
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, _| {
            b.iter(|| black_box(find(dir.path(), "FIXME", &config).unwrap()));
        });
    }
    group.finish();
}

fn bench_pruning(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_tree(dir.path(), 3, 4, 5).unwrap();
    let config = create_base_config(4);

    let mut group = c.benchmark_group("Pruning");
    // Nothing matches, so every directory is pruned
    group.bench_function("no_matches", |b| {
        b.iter(|| black_box(find(dir.path(), "absent", &config).unwrap()));
    });
    group.bench_function("all_match", |b| {
        b.iter(|| black_box(find(dir.path(), "Line", &config).unwrap()));
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_match_modes, bench_file_scaling, bench_thread_scaling, bench_pruning
}

criterion_main!(benches);
