//! Prints a sun-path report for a location, optionally filtered by a
//! condition over a synthetic temperature series.
//!
//! ```text
//! cargo run --example sun_path_report -- 48.21 16.37 1 "a > 24"
//! ```
//!
//! Set `RUST_LOG=debug` for sampling details.

use std::f64::consts::PI;
use sunpath::{AnalysisWindow, HourlySeries, PathKind, SunPath, SunPathRequest};

fn synthetic_temperature() -> HourlySeries {
    let values = (0..8760)
        .map(|h| {
            let day = f64::from(h / 24);
            let hour = f64::from(h % 24);
            12.0 + 10.0 * (2.0 * PI * (day - 110.0) / 365.0).sin()
                + 5.0 * (2.0 * PI * (hour - 9.0) / 24.0).sin()
        })
        .collect();
    HourlySeries::annual("Dry Bulb Temperature", "C", values)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let number = |i: usize, default: f64| {
        args.get(i)
            .and_then(|arg| arg.parse::<f64>().ok())
            .unwrap_or(default)
    };

    let request = SunPathRequest {
        window: AnalysisWindow::whole_year(),
        condition: args.get(3).cloned(),
        series: vec![synthetic_temperature()],
        annual_path: true,
        ..SunPathRequest::at(number(0, 48.21), number(1, 16.37), number(2, 1.0))
    };

    let output = match SunPath::compute(&request) {
        Ok(output) => output,
        Err(err) => {
            log::error!("{err}");
            std::process::exit(1);
        }
    };

    println!(
        "Sun-Path Diagram - Latitude: {}",
        output.location.latitude()
    );
    if !output.condition_label.is_empty() {
        println!("Conditional selection applied:\n{}", output.condition_label);
    }
    if let Some(selection) = output.selection {
        println!("{selection}");
    }

    for group in &output.groups {
        match group {
            Ok(group) => {
                let analemmas = group
                    .path_curves
                    .iter()
                    .filter(|c| matches!(c.kind, PathKind::Analemma { .. }))
                    .count();
                println!(
                    "\n{} sun positions, {:.1} sun up hours, {} curves ({analemmas} analemmas)",
                    group.positions.len(),
                    group.sun_up_hours,
                    group.path_curves.len()
                );
                for (label, (altitude, azimuth)) in group
                    .sample_labels
                    .iter()
                    .zip(group.altitudes.iter().zip(&group.azimuths))
                    .step_by(500)
                {
                    println!(
                        "  {} ALT = {altitude:.2}, AZM = {azimuth:.2}",
                        label.replace('\n', " | ")
                    );
                }
            }
            Err(err) => println!("\n{err}"),
        }
    }
}
