use std::path::PathBuf;
use clap::Parser;
use lightgin_server::config::{ServerConfig, DEFAULT_ALLOWED_ORIGINS, DEFAULT_HOST, DEFAULT_PORT};
use lightgin_server::features::{FeatureConfig, DEFAULT_FEATURE_WIDTH, DEFAULT_MAX_NODES};
use lightgin_server::model::DEFAULT_WEIGHTS_PATH;

mod commands;

#[derive(clap::Parser)]
struct Cli {
    /// Log specification, e.g. "info" or "warn,lightgin_server=debug"
    #[clap(long, default_value = "info,lightgin_server=debug")]
    log_spec: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve predictions over HTTP
    Serve(ServeCommand),
    /// Print the model input tensors for an edge list
    Features(FeaturesCommand),
    /// Classify a single edge list
    Predict(PredictCommand),
}

#[derive(clap::Args)]
struct ServeCommand {
    #[clap(long, default_value = DEFAULT_HOST)]
    host: String,

    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    #[clap(short, long, default_value = DEFAULT_WEIGHTS_PATH)]
    weights: PathBuf,

    /// Origin allowed to call the API cross-origin (repeatable)
    #[clap(long = "allowed-origin", num_args = 1.., default_values_t = DEFAULT_ALLOWED_ORIGINS.map(String::from))]
    allowed_origins: Vec<String>,

    /// Largest graph, in distinct nodes, accepted per request
    #[clap(long, default_value_t = DEFAULT_MAX_NODES)]
    max_nodes: usize,
}

#[derive(clap::Args)]
struct FeaturesCommand {
    #[clap(short, long)]
    edgelist: String,

    #[clap(short, long, default_value_t = DEFAULT_FEATURE_WIDTH)]
    feature_width: usize,

    #[clap(long, default_value_t = DEFAULT_MAX_NODES)]
    max_nodes: usize,
}

#[derive(clap::Args)]
struct PredictCommand {
    #[clap(short, long)]
    edgelist: String,

    #[clap(short, long, default_value = DEFAULT_WEIGHTS_PATH)]
    weights: PathBuf,
}


fn setup_logging(spec: &str) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let spec = flexi_logger::LogSpecification::parse(spec)?;
    let handle = flexi_logger::Logger::with(spec)
        .log_to_file(
            flexi_logger::FileSpec::default()
                .directory("logs")
                .basename("lightgin-server")
                .use_timestamp(false),
        )
        .duplicate_to_stderr(flexi_logger::Duplicate::Info)
        .format_for_files(flexi_logger::detailed_format)
        .format_for_stderr(flexi_logger::colored_detailed_format)
        .set_palette("b1;3;2;4;6".to_string())
        .start()?;
    Ok(handle)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_spec)?;

    match cli.command {
        Command::Serve(serve) => {
            let config = ServerConfig {
                host: serve.host,
                port: serve.port,
                weights: serve.weights,
                allowed_origins: serve.allowed_origins,
                features: FeatureConfig {
                    max_nodes: serve.max_nodes,
                    ..FeatureConfig::default()
                },
                ..ServerConfig::default()
            };
            commands::serve::serve(config)?;
        }
        Command::Features(features) => {
            commands::features::print_features(
                features.edgelist,
                FeatureConfig {
                    feature_width: features.feature_width,
                    max_nodes: features.max_nodes,
                }
            )?;
        }
        Command::Predict(predict) => {
            commands::predict::predict(predict.edgelist, predict.weights)?;
        }
    }

    Ok(())
}
