//! Benchmarks for Promitheus live in `benches/`.
