use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new("parent_guide=info,parent_guide_lib=info"));
  tracing_subscriber::registry()
    .with(filter)
    .with(tracing_subscriber::fmt::layer())
    .init();

  if let Err(e) = parent_guide_lib::run().await {
    tracing::error!("Parent guide failed: {}", e);
    std::process::exit(1);
  }
}
