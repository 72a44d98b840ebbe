fn main() -> anyhow::Result<()> {
    truthsense_lib::run()
}
