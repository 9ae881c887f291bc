//! Sample Request Generator
//!
//! Sends randomized patient records to the prediction API for manual testing.

use heart_disease_predictor::types::PatientFeatures;
use heart_disease_predictor::PredictionResponse;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Patient generator for testing
struct PatientGenerator {
    rng: rand::rngs::ThreadRng,
}

impl PatientGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a patient with a low-risk profile
    fn generate_low_risk(&mut self) -> PatientFeatures {
        PatientFeatures {
            age: self.rng.gen_range(25..55),
            sex: self.rng.gen_range(0..2),
            chest_pain_type: self.rng.gen_range(1..4),
            cholesterol: self.rng.gen_range(150..240),
            fasting_bs: 0,
            max_hr: self.rng.gen_range(140..200),
            exercise_angina: 0,
            oldpeak: round_tenth(self.rng.gen_range(0.0..1.0)),
            st_slope: 2,
        }
    }

    /// Generate a patient with a high-risk profile
    fn generate_high_risk(&mut self) -> PatientFeatures {
        PatientFeatures {
            age: self.rng.gen_range(55..80),
            sex: 1,
            chest_pain_type: 0, // Asymptomatic
            cholesterol: self.rng.gen_range(240..400),
            fasting_bs: self.rng.gen_range(0..2),
            max_hr: self.rng.gen_range(80..130),
            exercise_angina: 1,
            oldpeak: round_tenth(self.rng.gen_range(1.5..4.0)),
            st_slope: self.rng.gen_range(0..2), // Down or flat
        }
    }

    fn generate(&mut self, high_risk_rate: f64) -> (PatientFeatures, bool) {
        if self.rng.gen_bool(high_risk_rate) {
            (self.generate_high_risk(), true)
        } else {
            (self.generate_low_risk(), false)
        }
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_requests=info".parse()?),
        )
        .init();

    info!("Starting Sample Request Generator");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("http://localhost:5000/heart_disease_predictor/");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
    let high_risk_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.3)
        .clamp(0.0, 1.0);
    let delay_ms: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        url = %url,
        count = count,
        high_risk_rate = high_risk_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let mut generator = PatientGenerator::new();
    let mut positive = 0u64;
    let mut negative = 0u64;
    let mut failed = 0u64;

    for i in 0..count {
        let (patient, high_risk) = generator.generate(high_risk_rate);

        let response = match client.post(url).json(&patient).send().await {
            Ok(response) => response,
            Err(e) if i == 0 => {
                warn!(error = %e, "Prediction API unreachable. Running in dry-run mode.");
                return run_dry_mode(count, high_risk_rate, delay_ms).await;
            }
            Err(e) => {
                warn!(error = %e, "Request failed");
                failed += 1;
                continue;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Prediction API returned an error");
            failed += 1;
        } else {
            let prediction: PredictionResponse = response.json().await?;
            match prediction.label() {
                Some(true) => positive += 1,
                Some(false) => negative += 1,
                None => failed += 1,
            }
            info!(
                request = i + 1,
                high_risk_profile = high_risk,
                result = %prediction.result,
                "Prediction received"
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Sent {} requests ({} positive, {} negative, {} failed)",
        count, positive, negative, failed
    );

    Ok(())
}

async fn run_dry_mode(count: u64, high_risk_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no prediction API)");

    let mut generator = PatientGenerator::new();

    for i in 0..count {
        let (patient, _) = generator.generate(high_risk_rate);
        let json = serde_json::to_string_pretty(&patient)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
