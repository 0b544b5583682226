use std::path::PathBuf;

use antbee_rs::{
    classifier::{config::ClassifierConfig, worker::Recognizer},
    utils::image::decode_image,
    Classifier, Error,
};
use argh::FromArgs;

#[derive(FromArgs)]
/// Classify an image with an ONNX model and print the detected class
struct Args {
    /// path to the JSON config
    #[argh(option, short = 'c')]
    config: PathBuf,

    /// image to classify, defaults to the config's image_path
    #[argh(option, short = 'i')]
    image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = ClassifierConfig::from_file(&args.config)?;
    let image_path = args
        .image
        .or_else(|| config.image_path.clone())
        .ok_or_else(|| Error::InvalidConfig("no image given".to_string()))?;

    let image = decode_image(&image_path)?;
    let recognizer = Recognizer::new(Classifier::from_config(&config)?);
    let prediction = recognizer.run(image).await?;

    println!("{}", prediction);
    Ok(())
}
