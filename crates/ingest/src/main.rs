use ingest::runtime::{boot, drive};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    boot::init_logging();
    let (state, pool) = boot::boot().await?;
    drive::run(state, pool).await
}
