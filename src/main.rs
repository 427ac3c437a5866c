//! Thin entry point. All behavior lives in `hexreach-cli`; this binary
//! exists only so `cargo run` at the workspace root does something useful.

fn main() -> anyhow::Result<()> {
    hexreach_cli::run()
}
