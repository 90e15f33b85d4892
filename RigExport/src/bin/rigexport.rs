fn main() -> anyhow::Result<()> {
    rigexport::cli::run_cli()
}
