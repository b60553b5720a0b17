use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = dialog_worker::Args::parse();

	dialog_worker::run(args).await
}
