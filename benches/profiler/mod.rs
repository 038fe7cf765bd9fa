// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::str::FromStr;
use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

/// Criterion with a flamegraph profiler; `cargo bench -- --profile-time <secs>` writes the SVGs.
///
/// `FLOWDESK_PROFILE_FREQ`, `FLOWDESK_BENCH_SAMPLES`, `FLOWDESK_BENCH_WARMUP_SECS` and
/// `FLOWDESK_BENCH_MEASURE_SECS` tune a run.
pub fn criterion() -> Criterion {
    let frequency: i32 = env_or("FLOWDESK_PROFILE_FREQ", 100).clamp(1, 1000);
    let samples: usize = env_or("FLOWDESK_BENCH_SAMPLES", 50).clamp(10, 200);
    let warm_up: u64 = env_or("FLOWDESK_BENCH_WARMUP_SECS", 2).clamp(1, 60);
    let measure: u64 = env_or("FLOWDESK_BENCH_MEASURE_SECS", 4).clamp(1, 120);

    Criterion::default()
        .sample_size(samples)
        .warm_up_time(Duration::from_secs(warm_up))
        .measurement_time(Duration::from_secs(measure))
        .with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
}
