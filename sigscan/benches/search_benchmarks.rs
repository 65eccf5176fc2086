use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sigscan::{traverse, CollectingSink, Pattern, PatternMatcher};
use std::{fs::File, io::Cursor, io::Write};
use tempfile::tempdir;

fn create_test_files(
    dir: &tempfile::TempDir,
    file_count: usize,
    lines_per_file: usize,
) -> std::io::Result<()> {
    for i in 0..file_count {
        let file_path = dir.path().join(format!("test_{}.bin", i));
        let mut file = File::create(file_path)?;
        for j in 0..lines_per_file {
            writeln!(file, "Line {} of file {}: filler bytes with no signature", j, i)?;
        }
        if i % 3 == 0 {
            writeln!(file, "Data Recovery Labs")?;
        }
    }
    Ok(())
}

fn bench_matcher(c: &mut Criterion) {
    let pattern = Pattern::from_ascii("Data Recovery Labs").unwrap();
    let matcher = PatternMatcher::new(&pattern);
    let mut haystack = vec![b'.'; 8 * 1024 * 1024];
    let end = haystack.len();
    haystack[end - 18..].copy_from_slice(b"Data Recovery Labs");

    let mut group = c.benchmark_group("matcher");
    group.bench_function("slice_8mb", |b| {
        b.iter(|| matcher.is_match(black_box(&haystack)))
    });
    group.bench_function("streamed_8mb", |b| {
        b.iter(|| matcher.is_match_reader(Cursor::new(black_box(&haystack))).unwrap())
    });
    group.finish();
}

fn bench_traverse(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    create_test_files(&dir, 200, 500).unwrap();
    let pattern = Pattern::from_ascii("Data Recovery Labs").unwrap();

    c.bench_function("traverse_200_files", |b| {
        b.iter(|| {
            let mut sink = CollectingSink::new();
            traverse(dir.path(), &pattern, &mut sink).unwrap()
        })
    });
}

criterion_group!(benches, bench_matcher, bench_traverse);
criterion_main!(benches);
