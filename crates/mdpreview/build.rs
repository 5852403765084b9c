use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    built::write_built_file()?;

    let compiled_at = chrono::Utc::now()
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string();

    // Written as a string literal to be `include!`d.
    let out_file = PathBuf::from(env::var("OUT_DIR")?).join("compiled_at.txt");
    fs::write(out_file, format!("{compiled_at:?}"))?;

    Ok(())
}
