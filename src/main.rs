#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mauqifi_lib::run().await
}
