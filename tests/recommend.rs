//! Integration tests for the `recommend` command.
use agrinext::cli::{SoilOpts, handle_recommend_command};
use agrinext::recommend::{CropRecommender, SoilSample};
use agrinext::settings::Settings;
use std::path::Path;

const TRAINING_DATA: &str = "demos/india/crop_recommendation.csv";

#[test]
fn test_handle_recommend_command() {
    unsafe { std::env::set_var("AGRINEXT_LOG_LEVEL", "off") };

    let soil = SoilOpts {
        nitrogen: 20.0,
        phosphorus: 65.0,
        potassium: 20.0,
        temperature: 20.0,
        humidity: 21.0,
        ph: 5.8,
        rainfall: 104.0,
    };
    handle_recommend_command(Path::new(TRAINING_DATA), &soil, Some(Settings::default()))
        .unwrap();

    // The command prints the same crop the recommender gives for this field
    let recommender = CropRecommender::from_path(Path::new(TRAINING_DATA)).unwrap();
    assert_eq!(
        recommender.recommend(&SoilSample::from(&soil)),
        Ok("kidneybeans")
    );
}
