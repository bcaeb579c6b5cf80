#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mapero_partner::run().await
}
