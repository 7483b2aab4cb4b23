#[tokio::main]
async fn main() -> anyhow::Result<()> {
    supportpilot_server::start().await
}
