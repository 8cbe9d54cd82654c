/// Settings for loading and running a script. Everything here is optional
/// behavior around the interpreter; the language itself has no knobs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Extension a script path must carry, without the dot.
    pub source_extension: String,

    /// Join every `thread` unit once the main unit finishes, instead of
    /// returning (and, from the CLI, exiting) while they still run.
    pub wait_for_threads: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_extension: "dk".to_string(),
            wait_for_threads: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}
