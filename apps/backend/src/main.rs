#[tokio::main]
async fn main() -> anyhow::Result<()> {
    legal_study_backend::run().await
}
