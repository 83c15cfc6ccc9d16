use gauntlet_core::version::{build_profile, version_string, VERSION};
use miette::Result;

pub fn run(json: bool) -> Result<()> {
    if json {
        return super::print_json(&serde_json::json!({
            "version": VERSION,
            "profile": build_profile(),
        }));
    }
    println!("{}", version_string());
    Ok(())
}
