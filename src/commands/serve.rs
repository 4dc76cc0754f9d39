use std::sync::Arc;
use lightgin_server::config::ServerConfig;
use lightgin_server::model::LightGin;
use lightgin_server::server;

pub fn serve(config: ServerConfig) -> anyhow::Result<()> {
    // A model that fails to load means the server never binds.
    let model = Arc::new(LightGin::load(&config.weights, config.model)?);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(config, model))
}
