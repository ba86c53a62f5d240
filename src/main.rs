use anyhow::Result;
use artgen::models::{Config, GenerationOptions};
use artgen::Generator;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_MODEL: &str =
    "stability-ai/sdxl:39ed52f2a78e934b3ba6e2a89f5b1c712de7dfea535525255b1aa35c5565e08b";

#[derive(Debug, Parser)]
#[command(name = "artgen")]
#[command(about = "Generate an image from a text prompt via a hosted inference API")]
struct CliArgs {
    /// Text prompt describing the image.
    prompt: String,

    /// Model reference in 'model:version' format.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Things the model should avoid.
    #[arg(long)]
    negative_prompt: Option<String>,

    /// Number of inference steps.
    #[arg(long)]
    steps: Option<u32>,

    /// Guidance scale.
    #[arg(long)]
    guidance: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artgen=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let config = Config::from_env()?;
    let credential = std::env::var("REPLICATE_API_TOKEN").unwrap_or_default();

    let options = GenerationOptions {
        negative_prompt: args.negative_prompt,
        num_inference_steps: args.steps,
        guidance_scale: args.guidance,
    };

    let generator = Generator::from_config(&config);

    info!("Generating image for prompt: {}", args.prompt);
    let result = generator
        .generate(&credential, &args.prompt, &args.model, &options)
        .await?;

    if result.success {
        let url = result.data.unwrap_or_default();
        info!("Generation succeeded");
        println!("{}", url);
        Ok(())
    } else {
        let message = result.error.clone().unwrap_or_default();
        if result.is_auth_failure() {
            error!("Generation failed: {} (check REPLICATE_API_TOKEN)", message);
        } else {
            error!("Generation failed: {}", message);
        }
        std::process::exit(1);
    }
}
