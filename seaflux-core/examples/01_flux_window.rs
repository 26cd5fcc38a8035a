//! Single Flux Window Example
//!
//! Builds a 20-minute synthetic buoy record, runs it through the flux engine
//! and prints the per-window diagnostics and fluxes.
//!
//! ## What You'll Learn
//!
//! - Wrapping channel slices in `MotionInputs`
//! - Creating a `FluxProcessor` from a configuration
//! - Reading `WindowReport` diagnostics and `FluxEstimate` values
//! - How a corrupted motion sample shows up as a missing window
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_flux_window
//! ```

use std::f64::consts::PI;

use seaflux_core::{
    constants::normal_gravity, FluxProcessor, MotionInputs, PlatformConfig, ProcessingConfig,
};

struct Record {
    t: Vec<f64>,
    ch: Vec<Vec<f64>>,
}

/// Channel order: wind x/y/z, heading, rate x/y/z, accel x/y/z, latitude, sound
fn synthetic_record(n: usize) -> Record {
    let g = normal_gravity(47.0);
    let mut seed = 42u32;
    let mut noise = move || {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        seed as f64 / u32::MAX as f64 - 0.5
    };

    let mut ch = vec![Vec::with_capacity(n); 12];
    let mut t = Vec::with_capacity(n);
    for i in 0..n {
        let time = (i + 1) as f64 / 10.0;
        let (gust, up, heat) = (noise(), noise(), noise());
        let tilt = 0.04 * (2.0 * PI * time / 7.0).sin();
        let tilt_rate = 0.04 * 2.0 * PI / 7.0 * (2.0 * PI * time / 7.0).cos();

        t.push(1.7e9 + time);
        ch[0].push(9.0 + 1.5 * gust);
        ch[1].push(0.8 * noise());
        ch[2].push(-0.5 * gust + 0.3 * up);
        ch[3].push(215.0 + 3.0 * (2.0 * PI * time / 240.0).sin());
        ch[4].push(tilt_rate);
        ch[5].push(tilt_rate);
        ch[6].push(0.0);
        // gravity seen by a hull rolled and pitched by the same angle
        ch[7].push(-g * tilt.sin());
        ch[8].push(g * tilt.cos() * tilt.sin());
        ch[9].push(g * tilt.cos() * tilt.cos());
        ch[10].push(47.0);
        ch[11].push(34_200.0 + 40.0 * up + 20.0 * heat);
    }
    Record { t, ch }
}

fn inputs(r: &Record) -> MotionInputs<'_> {
    MotionInputs {
        timestamps: &r.t,
        wind: [&r.ch[0], &r.ch[1], &r.ch[2]],
        heading: &r.ch[3],
        rate: [&r.ch[4], &r.ch[5], &r.ch[6]],
        accel: [&r.ch[7], &r.ch[8], &r.ch[9]],
        latitude: &r.ch[10],
    }
}

fn main() {
    println!("SeaFlux Single Window Example");
    println!("=============================\n");

    let config = ProcessingConfig::default()
        .with_platform(PlatformConfig::default().with_lever_arm([0.0, 0.0, 0.8]));
    let processor = match FluxProcessor::new(config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return;
        }
    };

    let mut record = synthetic_record(12_000);
    for attempt in ["clean record", "corrupted rate_x[0]"] {
        println!("{attempt}:");
        let reports = match processor.process(&inputs(&record), Some(&record.ch[11])) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("  rejected: {e}");
                return;
            }
        };

        for report in &reports {
            println!("  window {} at t = {:.1}", report.span.index, report.timestamps.representative);
            println!("    compass:  {:?}", report.quality);
            println!("    replaced: {} samples", report.despike.total_replaced());
            match report.fluxes.fault() {
                Some(fault) => println!("    fluxes:   missing ({fault})"),
                None => println!(
                    "    fluxes:   uw = {:.4} m²/s², vw = {:.4} m²/s², wT = {:.4} K·m/s",
                    report.fluxes.uw(),
                    report.fluxes.vw(),
                    report.fluxes.wt()
                ),
            }
        }
        println!();

        record.ch[4][0] = 99_999.9;
    }
}
