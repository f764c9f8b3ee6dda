//! `rxnrag config` — Configuration management commands.

use std::path::Path;

use rxnrag_config::AppConfig;

use super::load_config;

pub fn validate(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    let config = match load_config(path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");
            config
        }
        Err(e) => {
            println!("   ❌ {e}");
            return Err(e);
        }
    };

    let files = [
        ("Vocabulary", Some(config.tokenizer.vocab_path.as_path())),
        ("Model", Some(config.embedder.model_path.as_path())),
        ("Records", Some(config.retriever.data_path.as_path())),
        ("Embeddings", Some(config.retriever.embeddings_path.as_path())),
        ("Index", config.retriever.index_path.as_deref()),
    ];
    let missing: Vec<_> = files
        .iter()
        .filter_map(|(label, p)| p.filter(|p| !p.exists()).map(|p| (label, p)))
        .collect();

    if missing.is_empty() {
        println!("   ✅ All data files present");
    } else {
        println!();
        for (label, p) in &missing {
            println!("   ⚠️  {label} file not found: {}", p.display());
        }
    }

    println!();
    println!("   Tokenizer: {:?}", config.tokenizer.kind);
    println!("   Device:    {}", config.embedder.device);
    println!("   Records:   {:?}", config.retriever.record_format);
    println!("   Top-k:     {}", config.retriever.top_k);
    println!("   Variant:   {}", config.prompt.variant);
    println!("   Direction: {}", config.prompt.direction);

    Ok(())
}

pub fn show(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

pub fn path(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(AppConfig::config_path);
    println!("{}", config_path.display());
    Ok(())
}

pub fn default() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::default_toml());
    Ok(())
}
