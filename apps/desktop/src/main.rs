#[tokio::main]
async fn main() -> anyhow::Result<()> {
    polyglot_directions_lib::run().await
}
