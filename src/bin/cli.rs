//! Command-line interface for funding accounts and routing CCIP messages
//! on a local fork.

use ccip_local_fork::cli;
use ccip_local_fork::setup_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (ctx, command) = cli::CliEnv::parse_and_convert()?;
    setup_tracing(&ctx.log_level);

    cli::run_command(ctx, command).await?;
    Ok(())
}
