use crate::output;
use std::path::PathBuf;

/// Validate the config files and print what was loaded. Exits non-zero when
/// the config fails to parse or validate; no cluster access is needed.
pub fn run(config: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let registry = super::load_registry(config)?;
    let summary = registry.summary();

    if json {
        output::print_json(&summary)?;
        return Ok(());
    }

    let count = |names: &[String]| {
        if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        }
    };
    output::print_table(
        &["SECTION", "COUNT", "NAMES"],
        vec![
            vec![
                "endpoints".into(),
                summary.endpoints.len().to_string(),
                count(&summary.endpoints),
            ],
            vec![
                "targets".into(),
                summary.targets.len().to_string(),
                count(&summary.targets),
            ],
            vec![
                "requests".into(),
                summary.requests.len().to_string(),
                count(&summary.requests),
            ],
            vec![
                "actions".into(),
                summary.actions.len().to_string(),
                count(&summary.actions),
            ],
        ],
    );
    println!("\nconfig OK");
    Ok(())
}
