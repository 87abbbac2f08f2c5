//! Resolution of effective options for a connection
// (c) 2024 Ross Younger

use tracing::debug;

use super::{
    matching::{fits_matches, fits_patterns},
    tokens::{expand_tokens, token_table},
    Block, CalculatedConfig, ConfigFilter, GlobalConfig, LocalContext,
};

impl CalculatedConfig<'_> {
    fn new(global: &GlobalConfig) -> CalculatedConfig<'_> {
        CalculatedConfig {
            common: global.common.clone(),
            matched: Vec::new(),
            source: &global.source,
        }
    }
}

impl<'a> CalculatedConfig<'a> {
    /// Folds in a matching block. Values we already hold take precedence.
    fn merge(&mut self, block: &'a Block) {
        self.common.absorb(block.common());
        self.matched.push(block);
    }
}

/// Works out the effective options for a connection.
///
/// Global-scope options are taken first, then every block that applies to
/// the connection, in declaration order. For each scalar option the first value
/// found wins; identity files accumulate in order.
#[must_use]
pub fn resolve<'a>(
    filter: &ConfigFilter,
    global: &'a GlobalConfig,
    local: &LocalContext,
) -> CalculatedConfig<'a> {
    let hostname = expand_tokens(&filter.hostname, &token_table(filter, local));
    let mut result = CalculatedConfig::new(global);
    for block in &global.configs {
        let fits = match block {
            Block::Host(h) => fits_patterns(&hostname, &h.hosts),
            Block::Match(m) => fits_matches(filter, &m.matches, local),
        };
        if fits {
            debug!("{block} at {} applies to {hostname}", block.origin());
            result.merge(block);
        }
    }
    result
}

impl GlobalConfig {
    /// Works out the effective options for a connection, using facts about the
    /// local system where the configuration calls for them.
    ///
    /// See [`resolve`].
    #[must_use]
    pub fn host_config(&self, filter: &ConfigFilter) -> CalculatedConfig<'_> {
        resolve(filter, self, &LocalContext::detect())
    }
}

///////////////////////////////////////////////////////////////////////////////////////
