//! Container for data to made accessible to all `stratctl` commands.
use std::sync::Arc;

use anyhow::Result;
use slog::Logger;

use crate::accounts::AccountResolver;
use crate::accounts::AccountStore;
use crate::apiclient::HttpSessionFactory;
use crate::formatter::Formatter;
use crate::session::Prompter;
use crate::session::SessionFactory;
use crate::session::TerminalPrompter;
use crate::Cli;

/// Container for data to made accessible to all `stratctl` commands.
pub struct Globals {
    /// History of accounts used in past invocations.
    pub accounts: Arc<dyn AccountResolver>,

    /// Parsed CLI arguments.
    pub cli: Cli,

    /// Strategy to authenticate sessions with.
    pub factory: Arc<dyn SessionFactory>,

    /// Configured process formatter for all output.
    pub formatter: Formatter,

    /// Configured process logger for advanced users feedback/debugging.
    pub logger: Logger,

    /// Interactive source for credentials missing from options and history.
    pub prompter: Arc<dyn Prompter>,
}

impl Globals {
    /// Initialise `stratctl` process [`Globals`].
    pub async fn initialise(cli: Cli) -> Result<Self> {
        let logger = crate::logging::configure(&cli.log)?;
        let formatter = crate::formatter::select(&cli.format);
        let accounts = Arc::new(AccountStore::new(logger.clone()));
        let factory = Arc::new(HttpSessionFactory::new(logger.clone()));
        let globals = Globals {
            accounts,
            cli,
            factory,
            formatter,
            logger,
            prompter: Arc::new(TerminalPrompter),
        };
        Ok(globals)
    }

    /// Build [`Globals`] around test doubles.
    #[cfg(test)]
    pub fn fixture(
        accounts: Arc<dyn AccountResolver>,
        factory: Arc<dyn SessionFactory>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        use clap::Parser;
        let cli = Cli::parse_from(["stratctl", "login"]);
        let formatter = crate::formatter::select(&cli.format);
        Globals {
            accounts,
            cli,
            factory,
            formatter,
            logger: crate::logging::null(),
            prompter,
        }
    }
}
