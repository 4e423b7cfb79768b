//! Heap benchmarks.

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use pbmalloc_core::Heap;

const BENCH_CAPACITY: usize = 256 << 20; // 256 MiB, maps lazily.

fn bench_alloc_release_cycle(c: &mut Criterion) {
    let sizes: &[usize] = &[16, 64, 256, 1024, 4096, 32768];
    let mut group = c.benchmark_group("alloc_release_cycle");

    for &size in sizes {
        group.bench_with_input(BenchmarkId::new("pbmalloc", size), &size, |b, &sz| {
            let mut heap = Heap::with_capacity(BENCH_CAPACITY).expect("reserve");
            b.iter(|| {
                let p = heap.alloc(sz).expect("alloc");
                // Steady state: each release feeds the next alloc via the list.
                unsafe { heap.release(p.as_ptr()) };
                criterion::black_box(p);
            });
        });
        group.bench_with_input(BenchmarkId::new("system", size), &size, |b, &sz| {
            b.iter(|| {
                let v = vec![0u8; sz];
                criterion::black_box(v);
            });
        });
    }
    group.finish();
}

fn bench_alloc_burst(c: &mut Criterion) {
    let mut group = c.benchmark_group("alloc_burst");

    group.bench_function("1000x64B", |b| {
        let mut heap = Heap::with_capacity(BENCH_CAPACITY).expect("reserve");
        b.iter(|| {
            let ptrs: Vec<_> = (0..1000).map(|_| heap.alloc(64).expect("alloc")).collect();
            for p in &ptrs {
                unsafe { heap.release(p.as_ptr()) };
            }
            criterion::black_box(ptrs);
        });
    });

    group.finish();
}

fn bench_reuse_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("reuse_scan");

    // Deep list of small blocks with one large block at the tail: first-fit
    // walks the whole chain for the large request. The chain is rebuilt per
    // iteration so the hit stays at the tail.
    for &depth in &[16usize, 128, 1024] {
        group.bench_with_input(BenchmarkId::new("first_fit_tail", depth), &depth, |b, &depth| {
            b.iter_batched_ref(
                || {
                    let mut heap = Heap::with_capacity(16 << 20).expect("reserve");
                    let big = heap.alloc(8192).expect("alloc big");
                    let smalls: Vec<_> =
                        (0..depth).map(|_| heap.alloc(16).expect("alloc")).collect();
                    unsafe {
                        heap.release(big.as_ptr());
                        for p in &smalls {
                            heap.release(p.as_ptr());
                        }
                    }
                    heap
                },
                |heap| {
                    let p = heap.alloc(8192).expect("reuse big");
                    criterion::black_box(p);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_resize_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_growth");

    group.bench_function("32B_to_4KiB_doubling", |b| {
        let mut heap = Heap::with_capacity(BENCH_CAPACITY).expect("reserve");
        b.iter(|| {
            let mut ptr = heap.alloc(32).expect("alloc").as_ptr();
            let mut size = 32usize;
            while size < 4096 {
                size *= 2;
                ptr = unsafe { heap.resize(ptr, size) }.expect("resize");
            }
            unsafe { heap.release(ptr) };
            criterion::black_box(ptr);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_alloc_release_cycle,
    bench_alloc_burst,
    bench_reuse_scan,
    bench_resize_growth
);
criterion_main!(benches);
