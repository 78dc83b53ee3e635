fn main() -> anyhow::Result<()> {
    phone_specs_lib::run()
}
