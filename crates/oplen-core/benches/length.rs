//! Benchmarks for length-decoding throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oplen_core::{disassemble, MachineMode};

/// A realistic mix: prologue, memory traffic, arithmetic, branches.
const X86_64_CODE: &[u8] = &[
    0x55, // push rbp
    0x48, 0x89, 0xE5, // mov rbp, rsp
    0x48, 0x83, 0xEC, 0x20, // sub rsp, 0x20
    0x48, 0x89, 0x7D, 0xF8, // mov [rbp-8], rdi
    0x48, 0x8B, 0x45, 0xF8, // mov rax, [rbp-8]
    0x48, 0x83, 0xC0, 0x01, // add rax, 1
    0x48, 0x89, 0x45, 0xF0, // mov [rbp-16], rax
    0x48, 0x83, 0x7D, 0xF0, 0x0A, // cmp qword [rbp-16], 10
    0x7E, 0x07, // jle .L1
    0xB8, 0x01, 0x00, 0x00, 0x00, // mov eax, 1
    0xEB, 0x05, // jmp .L2
    0xB8, 0x00, 0x00, 0x00, 0x00, // mov eax, 0
    0x48, 0x83, 0xC4, 0x20, // add rsp, 0x20
    0x5D, // pop rbp
    0xC3, // ret
];

fn walk(code: &[u8]) -> usize {
    let mut offset = 0;
    let mut count = 0;
    while offset < code.len() {
        match disassemble(&code[offset..], MachineMode::LongMode) {
            Ok(insn) => offset += usize::from(insn.length),
            Err(_) => offset += 1,
        }
        count += 1;
    }
    count
}

fn bench_length_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("length_decode");

    group.throughput(Throughput::Bytes(X86_64_CODE.len() as u64));
    group.bench_function("function_body", |b| {
        b.iter(|| walk(black_box(X86_64_CODE)))
    });

    let block: Vec<u8> = X86_64_CODE
        .iter()
        .copied()
        .cycle()
        .take(64 * 1024)
        .collect();
    group.throughput(Throughput::Bytes(block.len() as u64));
    group.bench_function("64k_block", |b| b.iter(|| walk(black_box(&block))));

    group.finish();
}

criterion_group!(benches, bench_length_decoding);
criterion_main!(benches);
