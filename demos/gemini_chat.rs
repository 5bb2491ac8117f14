//! Resolve the component's fields the way a host would, then call the model.

use dotenv::dotenv;
use gemini_component::{GoogleGenerativeAiComponent, LanguageModel, ModelComponent};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let component = GoogleGenerativeAiComponent::new();
    println!("{}", serde_json::to_string_pretty(&component.inputs())?);

    // The host would collect this from its secret input
    let api_key = std::env::var("GEMINI_API_KEY").unwrap_or_default();
    let values = json!({
        "model": "gemini-1.5-pro-latest",
        "gemini_api_key": api_key,
        "temperature": 0.4,
        "max_output_tokens": 512
    });
    let config = component.resolve(values.as_object().ok_or("field values must be an object")?)?;

    let model = component.build_language_model(&config)?;
    let text = model.invoke("Explain how AI works in two sentences.", None).await?;
    println!("{text}");

    Ok(())
}
