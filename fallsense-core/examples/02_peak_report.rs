//! Peak Report Example
//!
//! Runs the full preparation pipeline on a synthetic recording and prints
//! the detected spikes next to their labels, then the JSON run report.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_peak_report
//! ```

use fallsense_core::{
    config::PipelineConfig,
    dataset::{Dataset, Sample},
    fields::{SensorField, FIELD_COUNT},
    pipeline::prepare,
};

fn main() {
    println!("FallSense Peak Report Example");
    println!("=============================\n");

    // Three spikes; the second two are closer than the peak distance
    let spikes = [(120usize, 18.0f32), (300, 22.0), (305, 25.0)];
    let samples: Vec<Sample> = (0..400)
        .map(|i| {
            let mut sample = Sample::new([((i % 13) as f32) * 0.05; FIELD_COUNT]);
            let jerk = spikes
                .iter()
                .find(|&&(at, _)| at == i)
                .map_or(0.4 + ((i % 5) as f32) * 0.1, |&(_, height)| height);
            sample.set(SensorField::JerkMag, jerk);
            sample
        })
        .collect();
    let dataset = Dataset::new(samples);

    let config = PipelineConfig::default().with_peaks(SensorField::JerkMag, 0.99, 10);
    let prepared = match prepare(&dataset, &config) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("preparation failed: {}", e);
            return;
        }
    };

    println!("Peak threshold: {:.3}", prepared.peaks.height.unwrap_or_default());
    println!("Total detected peaks: {}", prepared.peaks.count());
    println!("{:>6}  {:>8}  {:>5}", "index", "JERK_MAG", "LABEL");
    for row in &prepared.peaks.rows {
        println!("{:>6}  {:>8.3}  {:>5}", row.index, row.value, row.label.unwrap_or_default());
    }

    match prepared.report().to_json() {
        Ok(json) => println!("\n{}", json),
        Err(e) => eprintln!("report serialisation failed: {}", e),
    }
}
