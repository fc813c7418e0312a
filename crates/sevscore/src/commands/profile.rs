//! Show the calibration profile and model details

use anyhow::Result;
use sevscore_pipeline::ModelInfo;
use sevscore_scoring::format_profile_summary;

use super::common::PredictorArgs;

pub fn profile(args: &PredictorArgs) -> Result<()> {
    let predictor = args.build_predictor()?;
    let info = predictor.model_info();

    println!("{}", format_profile_summary(&info.profile));
    println!();
    println!("{}", format_model_info(&info));

    Ok(())
}

fn format_model_info(info: &ModelInfo) -> String {
    [
        "Model:".to_string(),
        format!("  Embedding: {} ({} dims)", info.embedding_provider, info.embedding_dim),
        format!("  Scorer: {}", info.model),
        format!("  Translator: {}", info.translator),
        String::new(),
        "Limits:".to_string(),
        format!("  Max text chars: {}", info.max_text_chars),
        format!("  Max batch size: {}", info.max_batch_size),
        format!("  Batch concurrency: {}", info.batch_concurrency),
        format!("  Item timeout: {}ms", info.item_timeout_ms),
    ]
    .join("\n")
}
