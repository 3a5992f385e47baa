//! Labelling and Windowing Example
//!
//! Builds a short synthetic recording without a LABEL column, derives labels
//! from JERK_MAG, standardizes the inertial features and slices them into
//! training windows.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_label_and_window
//! ```

use fallsense_core::{
    build_windows,
    dataset::{Dataset, Sample},
    fields::{SensorField, FEATURE_FIELDS, FIELD_COUNT},
    labeler::{LabelingPolicy, PercentileThreshold},
    scaler::StandardScaler,
};

const SEQ_LEN: usize = 10;

fn main() {
    println!("FallSense Labelling and Windowing Example");
    println!("=========================================\n");

    // 60 samples of gentle motion with a fall-like jerk burst at t=42
    let samples: Vec<Sample> = (0..60)
        .map(|i| {
            let t = i as f32 * 0.1;
            let mut sample = Sample::new([t.sin() * 0.2; FIELD_COUNT]).with_timestamp(i * 20);
            let jerk = if (41..=43).contains(&i) { 30.0 - (i as f32 - 42.0).abs() * 10.0 } else { 0.5 + t.cos().abs() };
            sample.set(SensorField::JerkMag, jerk);
            sample
        })
        .collect();
    let dataset = Dataset::new(samples);
    println!("Recording: {} samples", dataset.len());

    let labels = match PercentileThreshold::default().label(&dataset) {
        Ok(labels) => labels,
        Err(e) => {
            eprintln!("labelling failed: {}", e);
            return;
        }
    };
    println!(
        "Threshold {:.3} on JERK_MAG -> {} fall samples",
        labels.threshold().unwrap_or_default(),
        labels.positives()
    );

    let windows = dataset
        .feature_matrix(&FEATURE_FIELDS)
        .and_then(|matrix| StandardScaler::fit_transform(&matrix))
        .and_then(|(_, scaled)| build_windows(&scaled, labels.labels(), SEQ_LEN));

    match windows {
        Ok(set) => {
            let (n, seq_len, features) = set.shape();
            println!("Windows: {} x {} x {} ({} labelled as falls)", n, seq_len, features, set.positives());
            for window in set.windows().iter().filter(|w| w.label() == 1) {
                println!("  rows [{}, {}) -> fall at row {}", window.start(), window.label_index(), window.label_index());
            }
        }
        Err(e) => eprintln!("windowing failed: {}", e),
    }
}
