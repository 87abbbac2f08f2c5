// (c) 2024 Ross Younger
//! Presentation of configuration values
//!
//! A [`CalculatedConfig`] is a [figment::Provider], so resolved values can be merged
//! into any figment stack. It also pretty-prints as a table.

use std::fmt::Display;

use figment::{
    providers::Serialized,
    value::{Dict, Map, Value},
    Metadata, Profile, Provider, Source,
};
use tabled::{settings::style::Style, Table, Tabled};

use super::{Block, CalculatedConfig, CommonConfig, GlobalConfig};

impl Provider for CalculatedConfig<'_> {
    fn metadata(&self) -> Metadata {
        Metadata::from("ssh configuration", Source::Custom(self.source.to_owned()))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(&self.common).data()
    }
}

// PRETTY PRINT SUPPORT ///////////////////////////////////////////////////////////////////////////////////////

#[derive(Tabled)]
struct PrettyOption {
    option: String,
    value: String,
}

impl PrettyOption {
    fn render_value(value: &Value) -> String {
        match value {
            Value::String(_tag, s) => s.to_string(),
            Value::Char(_tag, c) => c.to_string(),
            Value::Bool(_tag, b) => b.to_string(),
            Value::Num(_tag, num) => num
                .to_u128()
                .map(|u| u.to_string())
                .or_else(|| num.to_i128().map(|i| i.to_string()))
                .or_else(|| num.to_f64().map(|f| f.to_string()))
                .unwrap_or_default(),
            Value::Empty(_tag, _) => "<empty>".into(),
            Value::Dict(_tag, dict) => dict
                .iter()
                .map(|(k, v)| format!("{k}={}", Self::render_value(v)))
                .collect::<Vec<_>>()
                .join(","),
            Value::Array(_tag, vec) => vec
                .iter()
                .map(PrettyOption::render_value)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// One row per option that is set
    fn rows(common: &CommonConfig) -> Result<Vec<Self>, figment::Error> {
        let data = Serialized::defaults(common).data()?;
        let Some(dict) = data.get(&Profile::Default) else {
            return Ok(Vec::new());
        };
        Ok(dict
            .iter()
            .filter(|(_, v)| !matches!(v, Value::Array(_, a) if a.is_empty()))
            .map(|(k, v)| Self {
                option: k.clone(),
                value: Self::render_value(v),
            })
            .collect())
    }
}

#[derive(Tabled)]
struct PrettyBlock {
    block: String,
    origin: String,
    options: String,
}

impl PrettyBlock {
    fn new(block: &Block) -> Self {
        let options = PrettyOption::rows(block.common())
            .map(|rows| {
                rows.iter()
                    .map(|r| format!("{}={}", r.option, r.value))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_else(|e| format!("error: {e}"));
        Self {
            block: block.to_string(),
            origin: block.origin().to_string(),
            options,
        }
    }
}

/// Renders the merged options, one row per option that is set
impl Display for CalculatedConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match PrettyOption::rows(&self.common) {
            Ok(rows) => write!(f, "{}", Table::new(rows).with(Style::sharp())),
            Err(e) => write!(f, "error: {e}"),
        }
    }
}

/// Pretty-printing adapter listing the blocks that contributed to a [`CalculatedConfig`]
#[derive(Debug, Clone, Copy)]
pub struct MatchedBlocks<'a>(pub &'a CalculatedConfig<'a>);

impl Display for MatchedBlocks<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rows = self.0.matched.iter().map(|b| PrettyBlock::new(b));
        write!(f, "{}", Table::new(rows).with(Style::sharp()))
    }
}

/// Renders every block in declaration order, preceded by any global-scope options
impl Display for GlobalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match PrettyOption::rows(&self.common) {
            Ok(rows) if !rows.is_empty() => {
                writeln!(f, "{}", Table::new(rows).with(Style::sharp()))?;
            }
            Ok(_) => (),
            Err(e) => writeln!(f, "error: {e}")?,
        }
        let rows = self.configs.iter().map(PrettyBlock::new);
        write!(f, "{}", Table::new(rows).with(Style::sharp()))
    }
}

///////////////////////////////////////////////////////////////////////////////////////
