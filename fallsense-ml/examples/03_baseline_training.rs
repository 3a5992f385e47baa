//! Baseline Training Example
//!
//! Prepares a synthetic labelled recording, splits its windows, trains the
//! logistic baseline and prints the training curves and test scores.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_baseline_training
//! ```

use fallsense_core::{
    config::PipelineConfig,
    dataset::{Dataset, Label, Sample, FALL},
    fields::FIELD_COUNT,
    pipeline::prepare,
};
use fallsense_ml::{split_windows, LogisticBaseline, Rng, SequenceClassifier, TrainConfig, DEFAULT_SEED, DEFAULT_TEST_SIZE};

const ROWS: usize = 1_000;

fn main() {
    println!("FallSense Baseline Training Example");
    println!("===================================\n");

    // Falls roughly every 15 samples, announced by a burst on the row before
    let mut rng = Rng::new(3);
    let labels: Vec<Label> = (0..ROWS).map(|_| (rng.next_f32() < 1.0 / 15.0) as Label).collect();
    let samples: Vec<Sample> = (0..ROWS)
        .map(|r| {
            let burst = labels.get(r + 1) == Some(&FALL);
            let values = core::array::from_fn::<f32, FIELD_COUNT, _>(|_| {
                let noise = rng.next_f32_range(-0.5, 0.5);
                if burst { 4.0 + noise } else { noise }
            });
            Sample::new(values).with_timestamp(r as u64 * 20)
        })
        .collect();

    let dataset = match Dataset::new(samples).with_labels(labels) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("bad labels: {}", e);
            return;
        }
    };

    let prepared = match prepare(&dataset, &PipelineConfig::default()) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("preparation failed: {}", e);
            return;
        }
    };
    let (n, seq_len, features) = prepared.windows.shape();
    println!("Windows: {} x {} x {}, {} falls", n, seq_len, features, prepared.windows.positives());

    let (train, test) = match split_windows(&prepared.windows, DEFAULT_TEST_SIZE, DEFAULT_SEED) {
        Ok(split) => split,
        Err(e) => {
            eprintln!("split failed: {}", e);
            return;
        }
    };
    println!("Train: {}  Test: {}\n", train.len(), test.len());

    let mut model = LogisticBaseline::new();
    let history = match model.fit(&train, &TrainConfig::default()) {
        Ok(history) => history,
        Err(e) => {
            eprintln!("training failed: {}", e);
            return;
        }
    };

    println!("Epoch  Loss    Acc     ValLoss  ValAcc");
    for epoch in 0..history.epochs() {
        println!(
            "{:>5}  {:.4}  {:.3}   {:.4}   {:.3}",
            epoch + 1,
            history.loss[epoch],
            history.accuracy[epoch],
            history.val_loss.get(epoch).copied().unwrap_or(f32::NAN),
            history.val_accuracy.get(epoch).copied().unwrap_or(f32::NAN),
        );
    }

    match model.evaluate(&test) {
        Ok(eval) => {
            println!("\nTest loss: {:.4}", eval.loss);
            println!("Test accuracy: {:.3}", eval.accuracy);

            let report = prepared
                .report()
                .with_metric("test_loss", eval.loss)
                .with_metric("test_accuracy", eval.accuracy);
            if let Ok(json) = report.to_json() {
                println!("\nReport: {} bytes of JSON", json.len());
            }
        }
        Err(e) => eprintln!("evaluation failed: {}", e),
    }
}
