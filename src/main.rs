use bulkcast::cluster::client::ClusterClient;
use bulkcast::cluster::config::ClusterConfig;
use bulkcast::ingest::job::ImportJob;

use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 5 {
        eprintln!(
            "Usage: {} <inputDir> <clusterConfig> <keyspace> <columnFamily>",
            args[0]
        );
        eprintln!(
            "Example: {} ./sorted-triples cluster.json Keyspace1 Standard1",
            args[0]
        );
        std::process::exit(1);
    }

    let input_dir = PathBuf::from(&args[1]);
    let config_path = PathBuf::from(&args[2]);
    let keyspace = args[3].clone();
    let cf_name = args[4].clone();

    if keyspace.is_empty() {
        eprintln!("Keyspace must not be empty");
        std::process::exit(1);
    }
    if cf_name.is_empty() {
        eprintln!("Column family name must not be empty");
        std::process::exit(1);
    }

    let config = ClusterConfig::load(&config_path)?;
    tracing::info!(
        "Loaded cluster config: {} seed(s), replication factor {}",
        config.seeds.len(),
        config.replication_factor
    );

    let cluster = Arc::new(ClusterClient::connect(config).await?);

    let job = ImportJob::new(cluster, keyspace, cf_name);
    job.run(&input_dir).await?;

    Ok(())
}
