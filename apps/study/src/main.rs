fn main() -> anyhow::Result<()> {
    flashcards_study::run()
}
