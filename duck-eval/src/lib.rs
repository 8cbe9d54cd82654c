// Eval runs duck programs.
//
// A program is loaded in two passes (see loader): labels are registered
// first, then statements run from the `start` marker on. Statements are
// dispatched by the engine, which consults the resolver and the two
// evaluators and recurses into itself for `case` bodies, loop bodies and the
// assignments `input` and `invoke` perform.
//
// All global state lives in one Context shared by the main unit and every
// unit spawned with `thread`.

use std::sync::Arc;
use duck_base::Result;

#[cfg(test)]
mod test;

mod arith;
mod config;
mod console;
mod context;
mod engine;
mod loader;
mod relational;
mod resolve;

pub use arith::calc;
pub use config::Config;
pub use console::{Console, MemOutput};
pub use context::{Context, Snapshot, EXECUTING};
pub use engine::{Flow, Unit};
pub use loader::Program;
pub use relational::cond;
pub use resolve::{resolve, resolve_text};

pub struct Interpreter {
    ctx: Arc<Context>,
    config: Config,
}

impl Interpreter {
    /// An interpreter over the process's standard input and output.
    pub fn new(source: &str, config: Config) -> Self {
        Self::with_console(source, config, Console::stdio())
    }

    pub fn with_console(source: &str, config: Config, console: Console) -> Self {
        let program = Program::load(source);
        Interpreter {
            ctx: Arc::new(Context::new(program, console)),
            config,
        }
    }

    /// Runs the main unit to completion. Spawned units keep running unless
    /// the config asks to wait for them.
    pub fn run(&self) -> Result<()> {
        loader::run(&self.ctx)?;
        if self.config.wait_for_threads {
            self.join_threads();
        }
        Ok(())
    }

    pub fn join_threads(&self) {
        self.ctx.join_threads()
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn snapshot(&self) -> Snapshot {
        self.ctx.snapshot()
    }
}
