#[tokio::main]
async fn main() -> anyhow::Result<()> {
    issuecheck::logging::init();
    let args: Vec<String> = std::env::args().collect();
    issuecheck::run::run(args, None).await
}
