use lightgin_server::features::{preprocess_edgelist, FeatureConfig, FeatureDump};

pub fn print_features(edgelist: String, config: FeatureConfig) -> anyhow::Result<()> {
    log::debug!("Preprocessing edgelist {}", edgelist);
    let input = preprocess_edgelist(&edgelist, &config)?;
    log::info!("Graph has {} nodes", input.node_count());
    let dump = FeatureDump::from(&input);
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
