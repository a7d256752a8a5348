use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = townpulse_api::Args::parse();
	townpulse_api::run(args).await
}
