#[tokio::main]
async fn main() -> anyhow::Result<()> {
    routina_backend::run().await
}
