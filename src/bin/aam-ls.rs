use aam_language_server::lsp::server::serve;
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    serve().await
}
