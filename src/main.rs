#[tokio::main]
async fn main() -> anyhow::Result<()> {
    deepscan_lib::run().await
}
