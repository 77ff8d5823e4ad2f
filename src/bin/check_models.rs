//! CLI tool to verify Bedrock access with the local AWS credentials
//!
//! Sends a short prompt to each candidate model through the same invoker the
//! service uses, reports pass/fail per model and recommends the cheapest
//! working non-Anthropic model. Once a model works, the foundation models
//! offered in the region are listed as well.
//!
//! Usage:
//!   cargo run --bin check_models -- --region us-west-2
//!   cargo run --bin check_models -- --model amazon.nova-micro-v1:0
//!   cargo run --bin check_models -- --list-filter nova

use std::sync::Arc;

use anyhow::Result;
use aws_sdk_bedrock::types::FoundationModelSummary;
use bedrock_query_proxy::{
    config::{
        create_bedrock_client, create_bedrock_control_client, InferenceParams, ModelFamily,
        ModelTarget, Settings,
    },
    logging::{init_tracing, LogFormat},
    services::BackendError,
    BedrockBackend, InvocationError, ModelInvoker,
};
use clap::Parser;

/// Anthropic models, sent through InvokeModel
const ANTHROPIC_MODELS: &[&str] = &[
    "anthropic.claude-3-haiku-20240307-v1:0",
    "anthropic.claude-3-5-haiku-20241022-v1:0",
    "anthropic.claude-3-5-sonnet-20240620-v1:0",
];

/// Other models, sent through Converse, cheapest first
const CONVERSE_MODELS: &[&str] = &[
    "amazon.nova-micro-v1:0",
    "amazon.nova-lite-v1:0",
    "amazon.titan-text-lite-v1",
    "meta.llama3-8b-instruct-v1:0",
    "mistral.mistral-7b-instruct-v0:2",
];

/// Check which Bedrock models the current credentials can invoke
#[derive(Parser, Debug)]
#[command(name = "check_models")]
#[command(about = "Check which Bedrock models the current AWS credentials can invoke")]
struct Args {
    /// AWS region (defaults to AWS_REGION or us-east-1)
    #[arg(short, long)]
    region: Option<String>,

    /// Model to check; repeat to check several. Replaces the built-in lists.
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Prompt sent to every model
    #[arg(long, default_value = "Say 'Hello, Bedrock is working!' in a single sentence.")]
    prompt: String,

    /// Maximum output tokens per request
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(i32).range(1..))]
    max_tokens: i32,

    /// Only list foundation models whose ID contains this text (case-insensitive)
    #[arg(long, default_value = "claude")]
    list_filter: String,

    /// Skip listing the region's foundation models after a successful check
    #[arg(long)]
    no_list_models: bool,

    /// Log level for SDK diagnostics
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Outcome of checking a single model
struct CheckResult {
    model: ModelTarget,
    outcome: Result<String, InvocationError>,
}

/// A foundation model offered in the region
#[derive(Debug, Clone, PartialEq)]
struct ListedModel {
    id: String,
    name: Option<String>,
    provider: Option<String>,
}

impl From<FoundationModelSummary> for ListedModel {
    fn from(summary: FoundationModelSummary) -> Self {
        Self {
            id: summary.model_id,
            name: summary.model_name,
            provider: summary.provider_name,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, LogFormat::Compact);

    let mut settings = Settings::load()?;
    if let Some(region) = args.region {
        settings.aws_region = region;
    }

    let candidates: Vec<ModelTarget> = if args.models.is_empty() {
        ANTHROPIC_MODELS
            .iter()
            .chain(CONVERSE_MODELS)
            .map(|id| ModelTarget::new(*id))
            .collect()
    } else {
        args.models.iter().map(ModelTarget::new).collect()
    };

    println!("{}", "=".repeat(60));
    println!("  Amazon Bedrock Access Check");
    println!("{}", "=".repeat(60));
    println!("Region: {}", settings.aws_region);
    println!("Models: {}", candidates.len());
    println!("{}", "-".repeat(60));

    let client = create_bedrock_client(&settings).await;
    let invoker = ModelInvoker::new(
        Arc::new(BedrockBackend::new(client)),
        InferenceParams {
            max_tokens: args.max_tokens,
            ..InferenceParams::default()
        },
    );

    let mut results = Vec::with_capacity(candidates.len());
    for model in candidates {
        println!("\nTesting {} ({})...", model.id(), model.family());
        let outcome = invoker.invoke(&args.prompt, &model).await;
        report(&model, &outcome, &settings.aws_region);
        results.push(CheckResult { model, outcome });
    }

    let passed = results.iter().filter(|r| r.outcome.is_ok()).count();

    println!("\n{}", "=".repeat(60));
    println!("  Summary: {}/{} models reachable", passed, results.len());
    println!("{}", "=".repeat(60));
    for result in &results {
        let mark = if result.outcome.is_ok() { "✓" } else { "✗" };
        println!("  {} {}", mark, result.model.id());
    }

    match recommend(&results) {
        Some(model) => {
            println!("\nRecommended low-cost model: {}", model.id());
            println!("  export BEDROCK_MODEL_ID=\"{}\"", model.id());
        }
        None if passed > 0 => {
            println!("\nNo non-Anthropic model succeeded; the Anthropic models above are usable.");
        }
        None => {}
    }

    if passed == 0 {
        println!("\n✗ No model could be invoked. Resolve the errors above and retry.");
        std::process::exit(1);
    }

    if !args.no_list_models {
        list_available_models(&settings, &args.list_filter).await;
    }

    println!("\n✓ Bedrock is reachable with the current credentials.");
    Ok(())
}

/// Print the region's foundation models matching `filter`.
///
/// Listing needs `bedrock:ListFoundationModels`, which the service itself
/// never uses, so a failure here is only a warning.
async fn list_available_models(settings: &Settings, filter: &str) {
    println!("\nListing available models in {}...", settings.aws_region);

    let client = create_bedrock_control_client(settings).await;
    let response = match client.list_foundation_models().send().await {
        Ok(response) => response,
        Err(e) => {
            let err = BackendError::from_sdk_error(e);
            tracing::warn!(error = %err, "Failed to list foundation models");
            println!("  Could not list models: {}", err);
            println!("  This step is optional; the invoke check above is what matters.");
            return;
        }
    };

    let models: Vec<ListedModel> = response
        .model_summaries
        .unwrap_or_default()
        .into_iter()
        .map(ListedModel::from)
        .collect();

    let matching = filter_models(&models, filter);
    println!("{} of {} models match '{}'", matching.len(), models.len(), filter);
    println!("{}", "-".repeat(60));
    for model in matching {
        println!("Model ID: {}", model.id);
        println!("  Name: {}", model.name.as_deref().unwrap_or("N/A"));
        println!("  Provider: {}", model.provider.as_deref().unwrap_or("N/A"));
    }
}

/// Models whose ID contains `filter`, ignoring case; an empty filter keeps all
fn filter_models<'a>(models: &'a [ListedModel], filter: &str) -> Vec<&'a ListedModel> {
    let filter = filter.to_lowercase();
    models
        .iter()
        .filter(|model| model.id.to_lowercase().contains(&filter))
        .collect()
}

/// First successful non-Anthropic model, in check order
fn recommend(results: &[CheckResult]) -> Option<&ModelTarget> {
    results
        .iter()
        .find(|r| r.outcome.is_ok() && r.model.family() == ModelFamily::Converse)
        .map(|r| &r.model)
}

fn report(model: &ModelTarget, outcome: &Result<String, InvocationError>, region: &str) {
    match outcome {
        Ok(text) => {
            println!("  ✓ SUCCESS");
            println!("  Response: {}", text.trim());
        }
        Err(err) => {
            println!("  ✗ ERROR ({})", err.kind());
            println!("  Message: {}", err);
            for line in remediation(err, model, region) {
                println!("    {}", line);
            }
        }
    }
}

/// Suggested fixes for a failed check
fn remediation(err: &InvocationError, model: &ModelTarget, region: &str) -> Vec<String> {
    match err {
        InvocationError::PermissionDenied => vec![
            "1. Go to AWS Console → Amazon Bedrock → Model access".to_string(),
            format!("2. Request access to {}", model.id()),
            "3. Wait for approval (usually instant)".to_string(),
            "4. Ensure your IAM user/role has 'bedrock:InvokeModel' permission".to_string(),
        ],
        InvocationError::ModelNotFound { model_id } => vec![
            format!("1. Check that '{}' is a valid model ID", model_id),
            format!("2. Verify the model is offered in region {}", region),
            "3. Try a different region (us-west-2, us-east-1, ...)".to_string(),
        ],
        InvocationError::Provider { code, .. } if code == "ValidationException" => vec![
            "The request format was rejected.".to_string(),
            "The model may not support this API or may require an inference profile ID (e.g. 'us.' prefix).".to_string(),
        ],
        InvocationError::Provider { .. } => vec![],
        InvocationError::Unexpected(_) => vec![
            "1. AWS credentials may not be configured (run: aws configure)".to_string(),
            "2. Check network connectivity to the Bedrock endpoint".to_string(),
        ],
    }
}
