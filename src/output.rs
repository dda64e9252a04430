use owo_colors::OwoColorize;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(imported: usize, written: usize) -> Self {
        match imported {
            0 => Self {
                prefix: "•".yellow().to_string(),
                message: format!("No imports found, {} file(s) written", written),
            },
            n => Self {
                prefix: "✓".green().to_string(),
                message: format!(
                    "{} document(s) imported, {} file(s) written",
                    n.green(),
                    written
                ),
            },
        }
    }

    pub fn failed(failure: usize) -> Self {
        Self {
            prefix: "✗".red().to_string(),
            message: format!("{} import(s) failed", failure.red()),
        }
    }
}
