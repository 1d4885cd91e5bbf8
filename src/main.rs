fn main() -> anyhow::Result<()> {
    ai_history_analyser::cli::run()
}
