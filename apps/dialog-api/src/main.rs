use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = dialog_api::Args::parse();

	dialog_api::run(args).await
}
