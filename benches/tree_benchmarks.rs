use ark_bn254::Fr;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigUint;
use zk_whitelist::{commit, merkle::MerkleTree, storage::to_storage_string};

fn leaves(count: u64) -> Vec<Fr> {
    (0..count)
        .map(|i| commit(&BigUint::from(i + 1)).unwrap())
        .collect()
}

fn bench_commit(c: &mut Criterion) {
    let address = BigUint::parse_bytes(b"742d35cc6634c0532925a3b844bc454e4438f44e", 16).unwrap();
    c.bench_function("commit", |b| b.iter(|| commit(black_box(&address)).unwrap()));
}

fn bench_tree_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_construction");

    for height in [4u32, 8, 10, 12] {
        let leaves = leaves(1 << height);
        group.bench_with_input(BenchmarkId::from_parameter(height), &leaves, |b, leaves| {
            b.iter(|| MerkleTree::new(black_box(leaves.clone())).unwrap())
        });
    }

    group.finish();
}

fn bench_prove_membership(c: &mut Criterion) {
    let mut group = c.benchmark_group("prove_membership");

    for height in [4u32, 8, 12] {
        let tree = MerkleTree::new(leaves(1 << height)).unwrap();
        let target = tree.leaves()[tree.len() / 2];
        group.bench_with_input(BenchmarkId::from_parameter(height), &target, |b, target| {
            b.iter(|| tree.prove_membership(black_box(target)).unwrap())
        });
    }

    group.finish();
}

fn bench_storage_string(c: &mut Criterion) {
    let tree = MerkleTree::new(leaves(1 << 10)).unwrap();
    c.bench_function("to_storage_string_1024", |b| {
        b.iter(|| to_storage_string(black_box(&tree)))
    });
}

criterion_group!(
    benches,
    bench_commit,
    bench_tree_construction,
    bench_prove_membership,
    bench_storage_string
);
criterion_main!(benches);
